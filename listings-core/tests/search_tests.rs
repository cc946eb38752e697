use std::time::Duration;

use reqwest::Client;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use listings_core::{
    aggregate, search, AppConfig, Area, FetchConfig, FetchError, ListingQuery, QueryError,
    SourceCatalog,
};

fn rss_with_items(items: &[(&str, &str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, link, pub_date)| {
            format!(
                "<item><title>{title}</title><link>{link}</link><pubDate>{pub_date}</pubDate></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>T</title><link>http://example.com/</link><description>D</description>{body}</channel></rss>"#
    )
}

fn area(id: &str) -> Area {
    Area {
        id: id.into(),
        name: id.into(),
        region: "oregon".into(),
    }
}

fn config_for(server: &MockServer, areas: &[&str]) -> AppConfig {
    AppConfig {
        fetch: FetchConfig {
            request_timeout_seconds: 5,
            source_timeout_seconds: 1,
            retry_attempts: 0,
            retry_backoff_ms: 10,
            ..FetchConfig::default()
        },
        sources: SourceCatalog::with_template(
            format!(
                "{}/{{area}}/search/cta?format=rss&min_price={{min_price}}&max_price={{max_price}}",
                server.uri()
            ),
            areas.iter().map(|id| area(id)).collect(),
        ),
    }
}

async fn mount_feed(server: &MockServer, area: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/{area}/search/cta")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

const CIVIC: (&str, &str, &str) = (
    "2018 Honda Civic $15,000 60k mi",
    "http://x/1",
    "Mon, 21 Oct 2024 07:28:00 GMT",
);

#[tokio::test]
async fn single_listing_passes_default_filters() {
    let server = MockServer::start().await;
    mount_feed(&server, "portland", rss_with_items(&[CIVIC])).await;
    let config = config_for(&server, &["portland"]);

    let result = search(&Client::new(), &config, &ListingQuery::default())
        .await
        .unwrap();

    assert_eq!(result.count, 1);
    let listing = &result.listings[0];
    assert_eq!(listing.price, 15_000);
    assert_eq!(listing.year, 2018);
    assert_eq!(listing.make, "honda");
    assert_eq!(listing.mileage, 60_000);
    assert!(listing.is_deal());
}

#[tokio::test]
async fn max_mileage_excludes_listing() {
    let server = MockServer::start().await;
    mount_feed(&server, "portland", rss_with_items(&[CIVIC])).await;
    let config = config_for(&server, &["portland"]);

    let query = ListingQuery {
        max_mileage: 50_000,
        ..ListingQuery::default()
    };
    let result = search(&Client::new(), &config, &query).await.unwrap();

    assert_eq!(result.count, 0);
    assert!(result.listings.is_empty());
}

#[tokio::test]
async fn same_link_from_two_sources_is_deduplicated() {
    let server = MockServer::start().await;
    mount_feed(&server, "portland", rss_with_items(&[CIVIC])).await;
    mount_feed(
        &server,
        "seattle",
        rss_with_items(&[(
            "2018 Honda Civic Sport $14,500 60k mi",
            "http://x/1",
            "Tue, 22 Oct 2024 07:28:00 GMT",
        )]),
    )
    .await;
    let config = config_for(&server, &["portland", "seattle"]);

    let result = search(&Client::new(), &config, &ListingQuery::default())
        .await
        .unwrap();

    assert_eq!(result.count, 1);
    assert_eq!(result.listings[0].price, 15_000, "first source wins");
}

#[tokio::test]
async fn results_are_sorted_newest_first_across_sources() {
    let server = MockServer::start().await;
    mount_feed(
        &server,
        "eugene",
        rss_with_items(&[
            ("2014 Mazda 3 $7,000", "http://x/old", "Sat, 19 Oct 2024 10:00:00 GMT"),
            ("2016 Ford Fusion $9,000", "http://x/new", "Tue, 22 Oct 2024 10:00:00 GMT"),
        ]),
    )
    .await;
    mount_feed(
        &server,
        "bend",
        rss_with_items(&[(
            "2019 Subaru Outback $21,000",
            "http://x/mid",
            "Mon, 21 Oct 2024 10:00:00 GMT",
        )]),
    )
    .await;
    let config = config_for(&server, &["eugene", "bend"]);

    let result = search(&Client::new(), &config, &ListingQuery::default())
        .await
        .unwrap();

    let links: Vec<&str> = result.listings.iter().map(|l| l.link.as_str()).collect();
    assert_eq!(links, vec!["http://x/new", "http://x/mid", "http://x/old"]);
}

#[tokio::test]
async fn failing_sources_do_not_abort_aggregation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/salem/search/cta"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/medford/search/cta"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not xml at all"))
        .mount(&server)
        .await;
    mount_feed(&server, "portland", rss_with_items(&[CIVIC])).await;
    let config = config_for(&server, &["salem", "medford", "portland"]);
    let endpoints = config.sources.endpoints(ListingQuery::default().price_bounds());

    let aggregate = aggregate(&Client::new(), &endpoints, &config.fetch).await;

    assert_eq!(aggregate.listings.len(), 1);
    assert_eq!(aggregate.failures.len(), 2);
    assert_eq!(aggregate.failures[0].area, "salem");
    assert!(matches!(aggregate.failures[0].error, FetchError::Status(_)));
    assert_eq!(aggregate.failures[1].area, "medford");
    assert!(matches!(aggregate.failures[1].error, FetchError::Parse(_)));
}

#[tokio::test]
async fn hung_source_is_cut_off_by_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/klamath/search/cta"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rss_with_items(&[CIVIC]))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&server)
        .await;
    mount_feed(
        &server,
        "bend",
        rss_with_items(&[(
            "2010 Jeep Wrangler $12,000",
            "http://x/jeep",
            "Mon, 21 Oct 2024 10:00:00 GMT",
        )]),
    )
    .await;
    let config = config_for(&server, &["klamath", "bend"]);
    let endpoints = config.sources.endpoints(ListingQuery::default().price_bounds());

    let aggregate = aggregate(&Client::new(), &endpoints, &config.fetch).await;

    assert_eq!(aggregate.listings.len(), 1);
    assert_eq!(aggregate.listings[0].link, "http://x/jeep");
    assert!(matches!(aggregate.failures[0].error, FetchError::Timeout(_)));
}

#[tokio::test]
async fn price_bounds_are_sent_to_the_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bend/search/cta"))
        .and(query_param("format", "rss"))
        .and(query_param("min_price", "1000"))
        .and(query_param("max_price", "20000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(&[CIVIC])))
        .expect(1)
        .mount(&server)
        .await;
    let config = config_for(&server, &["bend"]);

    let query = ListingQuery {
        min_price: 1000,
        max_price: 20_000,
        ..ListingQuery::default()
    };
    let result = search(&Client::new(), &config, &query).await.unwrap();
    assert_eq!(result.count, 1);
}

#[tokio::test]
async fn inverted_price_range_fails_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let config = config_for(&server, &["portland"]);

    let query = ListingQuery {
        min_price: 5000,
        max_price: 100,
        ..ListingQuery::default()
    };
    let err = search(&Client::new(), &config, &query).await.unwrap_err();
    assert_eq!(err, QueryError::InvalidPriceRange { min: 5000, max: 100 });
}
