use serde_json::Value;

#[tokio::main]
async fn main() {
    let base =
        std::env::var("ENTRELIBROS_URL").unwrap_or_else(|_| "http://localhost:4000".to_string());

    let url = format!(
        "{base}/api/map?north=-34.54&south=-34.72&east=-58.36&west=-58.55&recentActivity=true"
    );
    println!("GET {url}");

    let response = reqwest::get(url).await.unwrap();
    println!("Status: {}", response.status());

    let payload: Value = response.json().await.unwrap();

    let count = |layer: &str| payload[layer].as_array().map_or(0, Vec::len);
    println!("Corners: {}", count("corners"));
    println!("Publications: {}", count("publications"));
    println!("Activity points: {}", count("activity"));
    println!("Generated at: {}", payload["meta"]["generatedAt"]);
}
