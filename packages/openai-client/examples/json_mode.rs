//! JSON-mode completion example

use openai_client::{ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    let request = ChatRequest::new("gpt-4o-mini")
        .message(Message::system(
            "You are a precise data extraction assistant. Return only valid JSON.",
        ))
        .message(Message::user(
            "Extract acquirer_company and target_company as JSON from: \
             \"Sanofi to acquire Inhibrx for $1.7B\"",
        ))
        .temperature(0.0);

    let parsed = client.json_completion(request).await?;

    println!("Acquirer: {}", parsed["acquirer_company"]);
    println!("Target:   {}", parsed["target_company"]);

    Ok(())
}
