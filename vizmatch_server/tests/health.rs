use serde_json::Value;

mod utils;

#[tokio::test]
async fn health_answers_even_with_a_dead_upstream() -> Result<(), Box<dyn std::error::Error>> {
    let relay_url = utils::spawn_relay(utils::unreachable_url().await?).await?;

    let response = reqwest::get(format!("{relay_url}/health")).await?;
    let response = utils::assert_ok_response(response).await?;
    let body = response.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
