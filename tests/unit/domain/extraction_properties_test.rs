// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use proptest::prelude::*;
use serpscout::domain::search::engine::SearchEngine;
use serpscout::infrastructure::search::bing::BingSearchEngine;
use serpscout::infrastructure::search::duckduckgo::DuckDuckGoSearchEngine;

#[derive(Debug, Clone)]
struct Entry {
    title: String,
    href: String,
    ad_marked: bool,
}

fn entry() -> impl Strategy<Value = Entry> {
    let href = prop_oneof![
        (0u32..50).prop_map(|n| format!("https://site{}.example/", n)),
        (0u32..50).prop_map(|n| format!("http://shop{}.example/page", n)),
        Just("https://www.bing.com/search?q=more".to_string()),
        Just("https://duckduckgo.com/?q=more".to_string()),
        Just("/relative/path".to_string()),
        Just("javascript:void(0)".to_string()),
        Just("ftp://files.example/".to_string()),
        Just("".to_string()),
    ];
    let title = prop_oneof![
        4 => "[a-z][a-z ]{0,20}",
        1 => Just("Sponsored listing".to_string()),
        1 => Just("Ad · cheap beans".to_string()),
        1 => Just("".to_string()),
    ];
    (title, href, proptest::bool::weighted(0.15)).prop_map(|(title, href, ad_marked)| Entry {
        title,
        href,
        ad_marked,
    })
}

fn bing_page(entries: &[Entry]) -> String {
    let items: String = entries
        .iter()
        .map(|e| {
            format!(
                r#"<li class="b_algo{}"><h2><a href="{}">{}</a></h2></li>"#,
                if e.ad_marked { " b_ad" } else { "" },
                e.href,
                e.title
            )
        })
        .collect();
    format!(r#"<ol id="b_results">{}</ol>"#, items)
}

fn ddg_page(entries: &[Entry]) -> String {
    let items: String = entries
        .iter()
        .map(|e| {
            format!(
                r#"<article data-testid="result"{}><h2><a data-testid="result-title-a" href="{}">{}</a></h2></article>"#,
                if e.ad_marked { r#" class="result--ad""# } else { "" },
                e.href,
                e.title
            )
        })
        .collect();
    format!(r#"<section class="react-results--main">{}</section>"#, items)
}

fn check_properties(engine: &dyn SearchEngine, html: &str) -> Result<(), TestCaseError> {
    let results = engine.extract(html, 3);

    prop_assert!(results.len() <= 3);
    for (i, r) in results.iter().enumerate() {
        prop_assert_eq!(r.position as usize, i + 1);
        prop_assert!(r.url.starts_with("http://") || r.url.starts_with("https://"));
        prop_assert!(!r.url.contains(engine.own_domain()));
        prop_assert!(!r.title.contains("Ad"));
        prop_assert!(!r.title.contains("Sponsored"));
        prop_assert!(!r.title.is_empty());
    }
    Ok(())
}

proptest! {
    #[test]
    fn bing_extraction_respects_filters(entries in proptest::collection::vec(entry(), 0..12)) {
        check_properties(&BingSearchEngine::new(), &bing_page(&entries))?;
    }

    #[test]
    fn duckduckgo_extraction_respects_filters(entries in proptest::collection::vec(entry(), 0..12)) {
        check_properties(&DuckDuckGoSearchEngine::new(), &ddg_page(&entries))?;
    }

    /// 干净输入时结果数为 min(3, 条目数)，顺序与文档一致
    #[test]
    fn clean_entries_keep_document_order(count in 0usize..8) {
        let entries: Vec<Entry> = (0..count)
            .map(|n| Entry {
                title: format!("roastery {}", n),
                href: format!("https://roastery{}.example/", n),
                ad_marked: false,
            })
            .collect();
        let results = BingSearchEngine::new().extract(&bing_page(&entries), 3);

        prop_assert_eq!(results.len(), count.min(3));
        for (i, r) in results.iter().enumerate() {
            prop_assert_eq!(&r.title, &format!("roastery {}", i));
        }
    }
}
