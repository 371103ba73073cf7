//! End-to-end crawls against a local `wiremock` server standing in for the
//! encyclopedia and the social networks.

use metric_crawler::{
	output, validate, CrawlMode, Fetch, FetchError, HttpFetcher, Orchestrator, RawConfig, Source,
};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIKI_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<table class="infobox">
  <tbody>
    <tr><td><a href="/wiki/Bundesland">Bundesland</a>:</td><td>Baden-Württemberg</td></tr>
    <tr><td>Einwohner:</td><td>126.329&nbsp;Einwohner <small>(31. Dez. 2022)</small></td></tr>
    <tr><td><a href="/wiki/Bev%C3%B6lkerungsdichte">Bevölkerungsdichte</a>:</td><td>1.060 Einwohner je km²</td></tr>
  </tbody>
</table>
</body></html>"#;

const PROFILE_PAGE: &str = r#"<!DOCTYPE html>
<html><body><header><ul>
  <li><button type="button"><span class="count"><span>1.2M</span></span> followers</button></li>
  <li><a href="/comets/"><span><span>6,900</span></span> posts</a></li>
</ul></header></body></html>"#;

#[tokio::test]
async fn http_fetcher_sends_rotating_user_agent() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/wiki/Ulm"))
		.and(header_exists("user-agent"))
		.respond_with(ResponseTemplate::new(200).set_body_string(WIKI_PAGE))
		.expect(1)
		.mount(&server)
		.await;

	let fetcher = HttpFetcher::new().expect("failed to build fetcher");
	let body = fetcher
		.fetch(&format!("{}/wiki/Ulm", server.uri()), "Mozilla/5.0 (test)")
		.await
		.expect("fetch should succeed");

	assert!(body.contains("Einwohner:"));

	let requests = server.received_requests().await.expect("recording enabled");
	let user_agent = requests[0]
		.headers
		.get("user-agent")
		.and_then(|value| value.to_str().ok());
	assert_eq!(user_agent, Some("Mozilla/5.0 (test)"));
}

#[tokio::test]
async fn http_fetcher_reports_non_success_status() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/blocked"))
		.respond_with(ResponseTemplate::new(429))
		.mount(&server)
		.await;

	let fetcher = HttpFetcher::new().expect("failed to build fetcher");
	let result = fetcher
		.fetch(&format!("{}/blocked", server.uri()), "Mozilla/5.0 (test)")
		.await;

	assert!(matches!(result, Err(FetchError::Status { status: 429, .. })));
}

#[tokio::test]
async fn full_team_and_location_runs_over_http() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/wiki/Ulm"))
		.respond_with(ResponseTemplate::new(200).set_body_string(WIKI_PAGE))
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/instagram/allgaeucomets"))
		.respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_PAGE))
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/facebook/allgaeucomets"))
		.respond_with(ResponseTemplate::new(500))
		.mount(&server)
		.await;

	let raw: RawConfig = serde_json::from_str(
		r#"{
			"min_delay_in_seconds": 0,
			"max_delay_in_seconds": 0,
			"locations": [
				{"name": "Ulm", "wikipedia": "Ulm"},
				{"name": "Ohne Seite"}
			],
			"teams": [
				{
					"name": "Allgäu Comets",
					"sport": "American Football",
					"league": "GFL",
					"division": "Süd",
					"location": "Kempten",
					"social_media": {"instagram": "allgaeucomets", "facebook": "allgaeucomets"}
				}
			]
		}"#,
	)
	.expect("config parses");

	let orchestrator = Orchestrator::new(HttpFetcher::new().expect("failed to build fetcher"))
		.with_shuffle(false)
		.with_base_url(Source::Wikipedia, format!("{}/wiki/", server.uri()))
		.with_base_url(Source::Instagram, format!("{}/instagram/", server.uri()))
		.with_base_url(Source::Facebook, format!("{}/facebook/", server.uri()));

	let locations = orchestrator
		.run(validate(&raw, CrawlMode::Locations).expect("valid locations"))
		.await;
	assert_eq!(locations.len(), 1);
	let wiki = &locations[0].metrics[&Source::Wikipedia];
	assert!(wiki.succeeded);
	assert_eq!(wiki.metrics["population"], 126329);
	assert_eq!(wiki.metrics["population_density"], 1060);

	let teams = orchestrator
		.run(validate(&raw, CrawlMode::Teams).expect("valid teams"))
		.await;
	assert_eq!(teams.len(), 1);
	let instagram = &teams[0].metrics[&Source::Instagram];
	assert!(instagram.succeeded);
	assert_eq!(instagram.metrics["followers"], 1200000);
	assert_eq!(instagram.metrics["posts"], 6900);
	let facebook = &teams[0].metrics[&Source::Facebook];
	assert!(!facebook.succeeded);
	assert_eq!(facebook.metrics["followers"], 0);

	let dir = std::env::temp_dir().join(format!("metric_crawler_it_{}", std::process::id()));
	let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
	let written = output::write_results(&teams, &dir, CrawlMode::Teams, date).expect("write");
	let json: serde_json::Value =
		serde_json::from_str(&std::fs::read_to_string(&written).expect("read back")).expect("json");
	std::fs::remove_dir_all(&dir).expect("cleanup");

	assert!(written.ends_with("teams/20240501_teams_crawl.json"));
	assert_eq!(json[0]["kind"], "team");
	assert_eq!(json[0]["name"], "Allgäu Comets");
	assert_eq!(json[0]["social_media"]["instagram"], "allgaeucomets");
	assert_eq!(json[0]["metrics"]["instagram"]["metrics"]["followers"], 1200000);
	assert_eq!(json[0]["metrics"]["facebook"]["succeeded"], false);
	assert!(json[0]["metrics"].get("youtube").is_none());
}
