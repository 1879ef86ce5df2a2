mod common;

use labelscout::{
    spotify::{albums, artists},
    utils::ReleaseKinds,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use common::{build_client, mount_token, release_json};

fn album_json(id: &str, label: Option<&str>, release_date: &str) -> Value {
    let mut album = release_json(id);
    album["label"] = json!(label);
    album["release_date"] = json!(release_date);
    album["popularity"] = json!(42);
    album
}

#[tokio::test]
async fn test_resolve_label_for_album() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/alb-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(album_json("alb-1", Some("Warp Records"), "2001")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client(&server);
    let label = albums::resolve_label_for_album(&client, "alb-1").await.unwrap();
    assert_eq!(label.as_deref(), Some("Warp Records"));

    // the second lookup is served from the cache
    let album = albums::get_album(&client, "alb-1").await.unwrap();
    assert_eq!(album.popularity, Some(42));
}

#[tokio::test]
async fn test_blank_label_resolves_to_none() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/alb-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_json("alb-2", Some("  "), "2001")))
        .mount(&server)
        .await;

    let (client, _) = build_client(&server);
    assert_eq!(
        albums::resolve_label_for_album(&client, "alb-2").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_resolve_label_for_track() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/tracks/trk-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "trk-1",
            "name": "Some Track",
            "album": release_json("alb-3"),
            "artists": [{ "id": "artist-1", "name": "Some Artist" }],
            "external_urls": { "spotify": "https://open.spotify.com/track/trk-1" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/alb-3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(album_json("alb-3", Some("Ninja Tune"), "1999")),
        )
        .mount(&server)
        .await;

    let (client, _) = build_client(&server);
    let label = albums::resolve_label_for_track(&client, "trk-1").await.unwrap();
    assert_eq!(label.as_deref(), Some("Ninja Tune"));
}

#[tokio::test]
async fn test_several_albums_are_batched() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let ids: Vec<String> = (0..25).map(|i| format!("alb-{i}")).collect();
    let first_batch: Vec<Value> = ids[..20]
        .iter()
        .map(|id| album_json(id, Some("Warp Records"), "2001"))
        .collect();
    // unknown ids come back as null
    let second_batch: Vec<Value> = ids[20..]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            if i == 0 {
                Value::Null
            } else {
                album_json(id, Some("Warp Records"), "2001")
            }
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/v1/albums"))
        .and(query_param("ids", ids[..20].join(",")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "albums": first_batch })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums"))
        .and(query_param("ids", ids[20..].join(",")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "albums": second_batch })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client(&server);
    let details = albums::get_several_albums(&client, &ids).await.unwrap();
    assert_eq!(details.len(), 24);
}

#[tokio::test]
async fn test_artist_label_relations() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/artists/art-1/albums"))
        .and(query_param("include_groups", "album,single"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [release_json("r1"), release_json("r2"), release_json("r3"), release_json("r1")],
            "total": 4,
            "limit": 50,
            "offset": 0,
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums"))
        .and(query_param("ids", "r1,r2,r3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "albums": [
                album_json("r1", Some("Warp Records"), "2001-01-01"),
                album_json("r2", None, "2003-01-01"),
                album_json("r3", Some("Warp Records"), "2005-01-01")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client(&server);
    let relations = artists::artist_label_relations(&client, "art-1", &ReleaseKinds::default())
        .await
        .unwrap();

    assert_eq!(relations.len(), 2);
    assert_eq!(relations[0].label, "Warp Records");
    assert_eq!(relations[0].releases.len(), 2);
    // newest first within a label
    assert_eq!(relations[0].releases[0].id, "r3");
    assert_eq!(relations[1].label, "Unknown label");
}

#[tokio::test]
async fn test_artist_releases_follow_pagination() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let first: Vec<Value> = (0..50).map(|i| release_json(&format!("p1-{i}"))).collect();
    let second: Vec<Value> = (0..7).map(|i| release_json(&format!("p2-{i}"))).collect();
    Mock::given(method("GET"))
        .and(path("/v1/artists/art-2/albums"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": first,
            "total": 57,
            "next": "https://api.spotify.com/v1/artists/art-2/albums?offset=50"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/art-2/albums"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": second,
            "total": 57,
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client(&server);
    let releases = artists::get_artist_releases(&client, "art-2", &ReleaseKinds::default())
        .await
        .unwrap();
    assert_eq!(releases.len(), 57);
}
