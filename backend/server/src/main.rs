#[tokio::main]
async fn main() {
    entrelibros::start_server().await;
}
