#![allow(clippy::unwrap_used)]
// Integration tests for the production repository wiring, driven through
// a wiremock server standing in for the city dataset host.

use std::time::Duration;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smartcity_core::{
    CityError, CityRepository, CoreConfig, FetchCityList, GetCity, SearchCity, build_repository,
};

const CITIES_PATH: &str = "dataset/raw/cities.json";

fn dataset() -> serde_json::Value {
    json!([
        { "_id": 707_860, "name": "Hurzuf", "country": "UA", "coord": { "lon": 34.283_333, "lat": 44.549_999 } },
        { "_id": 519_188, "name": "Novinki", "country": "RU", "coord": { "lon": 37.666_668, "lat": 55.683_334 } },
        { "_id": 1_283_378, "name": "Gorkhā", "country": "NP", "coord": { "lon": 84.633_331, "lat": 28.0 } },
        { "_id": 3_433_955, "name": "Provincia de Cordoba", "country": "AR", "coord": { "lon": -63.5, "lat": -32.0 } }
    ])
}

async fn setup() -> (MockServer, CoreConfig, tempfile::TempDir) {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = CoreConfig::with_favorites_file(dir.path().join("favorite_preferences.json"));
    config.base_url = Url::parse(&server.uri()).unwrap();
    config.cities_path = CITIES_PATH.into();
    config.timeout = Duration::from_secs(2);

    (server, config, dir)
}

#[tokio::test]
async fn search_fetches_once_and_merges_persisted_favorites() {
    let (server, config, _dir) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/{CITIES_PATH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset()))
        .expect(1)
        .mount(&server)
        .await;

    let repo = build_repository(&config).unwrap();
    assert!(repo.fetch_city_list().await.unwrap());
    assert!(repo.add_favorite(519_188).await.unwrap());

    let search = SearchCity::new(repo.clone());
    let results: Vec<_> = search.execute("o").collect().await;
    let found = results.into_iter().next().unwrap().unwrap();
    let rows: Vec<_> = found.iter().map(|c| (c.name.as_str(), c.is_favorite)).collect();
    assert_eq!(
        rows,
        vec![("Gorkhā", false), ("Novinki", true), ("Provincia de Cordoba", false)]
    );
}

#[tokio::test]
async fn favorites_survive_a_new_repository() {
    let (server, config, _dir) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/{CITIES_PATH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset()))
        .mount(&server)
        .await;

    let first = build_repository(&config).unwrap();
    first.add_favorite(707_860).await.unwrap();
    drop(first);

    // A fresh repository starts with an empty cache but the same file.
    let second = build_repository(&config).unwrap();
    let get = GetCity::new(second.clone());
    assert_eq!(get.execute(707_860).await, Err(CityError::CityNotFound));

    FetchCityList::new(second).execute().await.unwrap();
    let city = get.execute(707_860).await.unwrap();
    assert_eq!(city.name, "Hurzuf");
    assert!(city.is_favorite);
}

#[tokio::test]
async fn server_error_is_unknown_and_unreachable_is_connection_error() {
    let (server, config, _dir) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let repo = build_repository(&config).unwrap();
    assert_eq!(
        FetchCityList::new(repo).execute().await,
        Err(CityError::Unknown)
    );

    let mut offline = config.clone();
    offline.base_url = Url::parse("http://127.0.0.1:9/").unwrap();
    let repo = build_repository(&offline).unwrap();
    assert_eq!(
        FetchCityList::new(repo).execute().await,
        Err(CityError::ConnectionError)
    );
}

#[tokio::test]
async fn slow_host_times_out_as_connection_error() {
    let (server, mut config, _dir) = setup().await;
    config.timeout = Duration::from_millis(100);

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(dataset())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let repo = build_repository(&config).unwrap();
    assert_eq!(
        FetchCityList::new(repo).execute().await,
        Err(CityError::ConnectionError)
    );
}

#[tokio::test]
async fn city_list_refreshes_after_initial_snapshot() {
    let (server, config, _dir) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset()))
        .expect(2)
        .mount(&server)
        .await;

    let repo = build_repository(&config).unwrap();
    repo.fetch_city_list().await.unwrap();

    let items: Vec<_> = repo.city_list().collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap().len(), 4);
    assert_eq!(items[1].as_ref().unwrap().len(), 4);
    assert!(repo.local().last_refresh().is_some());
}
