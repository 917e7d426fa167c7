use fyyur_dal::{
    SearchResult,
    details::VenueDetails,
    venue::{Area, Venue, VenueShort},
};
use fyyur_e2e_tests::{
    extend_url, prepare_env,
    rest::{create_venue, venue_payload},
    spawn_server,
};
use fyyur_types::Genre;
use reqwest::StatusCode;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_venues() {
    let (args, _config_guard) = prepare_env("test_venues").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();

    let client = reqwest::Client::new();
    let api_url = base_url.join("api/venue").unwrap();

    let response = client
        .post(api_url.clone())
        .json(&venue_payload("The Musical Hop", "San Francisco", "CA"))
        .send()
        .await
        .unwrap();
    info!("Response: {:#?}", response);
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let venue: Venue = response.json().await.unwrap();
    assert_eq!(location, extend_url(&api_url, venue.id).as_str());
    assert!(venue.genres.contains(Genre::Jazz));
    assert!(venue.seeking_talent);

    let record_url = extend_url(&api_url, venue.id);
    let rec: Venue = client
        .get(record_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rec, venue);

    let mut update = venue_payload("The Musical Hop", "San Francisco", "CA");
    update["genres"] = serde_json::json!(["Classical"]);
    update["seeking_talent"] = serde_json::json!(false);
    update["seeking_description"] = serde_json::Value::Null;
    let response = client
        .put(record_url.clone())
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rec: Venue = response.json().await.unwrap();
    assert_eq!(rec.genres.len(), 1);
    assert!(rec.genres.contains(Genre::Classical));
    assert!(!rec.seeking_talent);

    let other = create_venue(&client, &base_url, "Park Square Live Music & Coffee", "San Francisco", "CA")
        .await
        .unwrap();
    create_venue(&client, &base_url, "The Dueling Pianos Bar", "New York", "NY")
        .await
        .unwrap();

    let count: u64 = client
        .get(extend_url(&api_url, "count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, 3);

    let all: Vec<VenueShort> = client
        .get(extend_url(&api_url, "all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let areas: Vec<Area> = client
        .get(api_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(areas.len(), 2);
    let sf = areas.iter().find(|a| a.city == "San Francisco").unwrap();
    assert_eq!(sf.venues.len(), 2);
    assert!(sf.venues.iter().all(|v| v.num_upcoming_shows == 0));

    let details: VenueDetails = client
        .get(extend_url(&record_url, "details"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(details.venue.id, venue.id);
    assert_eq!(details.past_shows_count, 0);
    assert_eq!(details.upcoming_shows_count, 0);

    let response = client.delete(extend_url(&api_url, other.id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client.get(extend_url(&api_url, other.id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = client.delete(extend_url(&api_url, other.id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[traced_test]
async fn test_venue_search() {
    let (args, _config_guard) = prepare_env("test_venue_search").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();

    let client = reqwest::Client::new();
    for name in ["A", "B", "C"] {
        create_venue(&client, &base_url, name, "Austin", "TX")
            .await
            .unwrap();
    }
    let search_url = base_url.join("api/venue/search").unwrap();

    let result: SearchResult<VenueShort> = client
        .post(search_url.clone())
        .form(&[("search_term", "")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result.count, 3);

    let result: SearchResult<VenueShort> = client
        .post(search_url.clone())
        .form(&[("search_term", "b")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.data[0].name, "B");

    let response = client
        .post(search_url)
        .form(&[("search_term", "xyz")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result: SearchResult<VenueShort> = response.json().await.unwrap();
    assert_eq!(result.count, 0);
    assert!(result.data.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_venue_validation() {
    let (args, _config_guard) = prepare_env("test_venue_validation").await.unwrap();
    let base_url = args.base_url.clone();
    spawn_server(args).await.unwrap();

    let client = reqwest::Client::new();
    let api_url = base_url.join("api/venue").unwrap();

    let invalid = [
        ("state", serde_json::json!("California")),
        ("phone", serde_json::json!("1231231234")),
        ("facebook_link", serde_json::json!("not a link")),
        ("seeking_description", serde_json::Value::Null),
        ("genres", serde_json::json!(["Polka"])),
        ("genres", serde_json::json!([])),
        ("name", serde_json::json!("")),
    ];
    for (field, value) in invalid {
        let mut payload = venue_payload("Invalid", "Reno", "NV");
        payload[field] = value;
        let response = client.post(api_url.clone()).json(&payload).send().await.unwrap();
        info!("Response for invalid {field}: {:#?}", response);
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid {field}"
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].is_string(), "invalid {field}");
    }

    let response = client.get(extend_url(&api_url, 999)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Venue 999"));

    let response = client
        .put(extend_url(&api_url, 999))
        .json(&venue_payload("Nowhere", "Reno", "NV"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let count: u64 = client
        .get(extend_url(&api_url, "count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, 0);
}
