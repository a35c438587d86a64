// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serpscout::domain::search::engine::SearchEngine;
use serpscout::infrastructure::search::bing::BingSearchEngine;
use serpscout::infrastructure::search::duckduckgo::DuckDuckGoSearchEngine;
use serpscout::infrastructure::search::engine_by_name;

/// Bing 改版后结果只保留 `.b_algo` 类，回退选择器仍能命中
#[test]
fn bing_falls_back_when_primary_selector_misses() {
    let html = r#"
    <div id="b_content">
      <div class="b_algo"><h2><a href="https://one.example/">One</a></h2></div>
      <div class="b_algo"><h2><a href="https://two.example/">Two</a></h2></div>
    </div>"#;

    let results = BingSearchEngine::new().extract(html, 3);
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].url, "https://two.example/");
}

#[test]
fn bing_link_outside_title_is_used() {
    let html = r#"
    <ol id="b_results">
      <li class="b_algo">
        <h2>Roastery Without Anchor</h2>
        <div class="b_caption"><a href="https://roastery.example/">roastery.example</a></div>
      </li>
    </ol>"#;

    let results = BingSearchEngine::new().extract(html, 3);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Roastery Without Anchor");
    assert_eq!(results[0].url, "https://roastery.example/");
}

#[test]
fn bing_skips_duplicate_urls() {
    let html = r#"
    <ol id="b_results">
      <li class="b_algo"><h2><a href="https://one.example/">One</a></h2></li>
      <li class="b_algo"><h2><a href="https://one.example/">One again</a></h2></li>
      <li class="b_algo"><h2><a href="https://two.example/">Two</a></h2></li>
    </ol>"#;

    let results = BingSearchEngine::new().extract(html, 3);
    let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two"]);
    assert_eq!(results[1].position, 2);
}

/// 标题里出现 "Ad" 子串即视为广告（包括 "Advanced" 这类普通单词）
#[test]
fn sponsored_title_filter_is_literal_substring() {
    let engine = BingSearchEngine::new();
    assert!(engine.is_sponsored_title("Ad · Beans"));
    assert!(engine.is_sponsored_title("Sponsored"));
    assert!(engine.is_sponsored_title("Advanced Roasting"));
    assert!(!engine.is_sponsored_title("roasted to order"));
}

#[test]
fn duckduckgo_ad_marker_on_descendant() {
    let html = r#"
    <section class="react-results--main">
      <article data-testid="result">
        <span data-testid="ad">Ad</span>
        <h2><a data-testid="result-title-a" href="https://promo.example/">Promo</a></h2>
      </article>
      <article data-testid="result">
        <h2><a data-testid="result-title-a" href="https://organic.example/">Organic</a></h2>
      </article>
    </section>"#;

    let results = DuckDuckGoSearchEngine::new().extract(html, 3);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "https://organic.example/");
}

#[test]
fn engine_lookup_by_name() {
    let engine = engine_by_name("duckduckgo").unwrap();
    assert_eq!(engine.home_url(), "https://duckduckgo.com/");
    assert!(engine_by_name("yandex").is_err());
}
