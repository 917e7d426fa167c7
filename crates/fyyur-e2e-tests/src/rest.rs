use anyhow::{Result, anyhow};
use fyyur_dal::{artist::Artist, show::Show, venue::Venue};
use reqwest::{StatusCode, Url};
use serde_json::json;
use tracing::info;

pub fn venue_payload(name: &str, city: &str, state: &str) -> serde_json::Value {
    json!({
        "name": name,
        "city": city,
        "state": state,
        "address": "1015 Folsom Street",
        "phone": "123-123-1234",
        "genres": ["Jazz", "Reggae"],
        "facebook_link": "https://www.facebook.com/TheMusicalHop",
        "seeking_talent": true,
        "seeking_description": "We are on the lookout for a local artist to play every two weeks."
    })
}

pub fn artist_payload(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "phone": "326-123-5000",
        "genres": ["rock n roll"],
        "image_link": "https://images.example.com/petals.jpg"
    })
}

async fn post_created<T>(client: &reqwest::Client, api_url: Url, payload: &serde_json::Value) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let response = client.post(api_url).json(payload).send().await?;
    info!("Response: {:#?}", response);
    if response.status() != StatusCode::CREATED {
        return Err(anyhow!("Unexpected status {}", response.status()));
    }
    if response.headers().get(reqwest::header::LOCATION).is_none() {
        return Err(anyhow!("Missing Location header"));
    }
    Ok(response.json().await?)
}

pub async fn create_venue(
    client: &reqwest::Client,
    base_url: &Url,
    name: &str,
    city: &str,
    state: &str,
) -> Result<Venue> {
    let api_url = base_url.join("api/venue")?;
    post_created(client, api_url, &venue_payload(name, city, state)).await
}

pub async fn create_artist(client: &reqwest::Client, base_url: &Url, name: &str) -> Result<Artist> {
    let api_url = base_url.join("api/artist")?;
    post_created(client, api_url, &artist_payload(name)).await
}

pub async fn create_show(
    client: &reqwest::Client,
    base_url: &Url,
    venue_id: i64,
    artist_id: i64,
    start_time: &str,
) -> Result<Show> {
    let api_url = base_url.join("api/show")?;
    let payload = json!({"venue_id": venue_id, "artist_id": artist_id, "start_time": start_time});
    post_created(client, api_url, &payload).await
}
