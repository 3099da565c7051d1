use std::time::Duration;

use kotoba_config::dictionary::DictionaryConfig;
use kotoba_core::{Dictionary, DictionaryMetadata, ScrapeError};
use kotoba_types::{Example, WordEntry};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// CSS selectors of a Sigure word card
struct CardSelectors {
    card: Selector,
    word: Selector,
    kana: Selector,
    accent: Selector,
    part: Selector,
    level: Selector,
    translation: Selector,
    example: Selector,
    example_jp: Selector,
    example_ch: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            card: compile(".word-card")?,
            word: compile(".word-card__word")?,
            kana: compile(".word-card__kana")?,
            accent: compile(".word-card__badge--accent")?,
            part: compile(".word-card__badge--part")?,
            level: compile(".word-card__badge--level")?,
            translation: compile(".word-card__translation-text")?,
            example: compile(".word-card__examples-list li")?,
            example_jp: compile(".example-jp")?,
            example_ch: compile(".example-ch")?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::InvalidSelector(format!("'{selector}': {e}")))
}

/// Trimmed text of every match, concatenated
fn text_of(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|e| e.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn first_text_of(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts word cards from a Sigure dictionary page
pub struct CardParser {
    selectors: CardSelectors,
}

impl CardParser {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            selectors: CardSelectors::new()?,
        })
    }

    /// Cards without a headword are skipped, as are examples without Japanese text
    pub fn parse(&self, html: &str) -> Vec<WordEntry> {
        let document = Html::parse_document(html);
        let s = &self.selectors;

        document
            .select(&s.card)
            .filter_map(|card| {
                let word = text_of(&card, &s.word);
                if word.is_empty() {
                    return None;
                }

                let examples = card
                    .select(&s.example)
                    .filter_map(|li| {
                        let jap = text_of(&li, &s.example_jp);
                        let cht = text_of(&li, &s.example_ch);
                        (!jap.is_empty()).then_some(Example { jap, cht })
                    })
                    .collect();

                Some(WordEntry {
                    word,
                    reading: text_of(&card, &s.kana),
                    accent: text_of(&card, &s.accent),
                    part: text_of(&card, &s.part),
                    level: text_of(&card, &s.level),
                    meaning: first_text_of(&card, &s.translation),
                    examples,
                    ..Default::default()
                })
            })
            .collect()
    }
}

/// Scrapes `sigure.tw` word pages
pub struct SigureDictionary {
    client: reqwest::Client,
    base_url: Url,
    parser: CardParser,
}

impl SigureDictionary {
    pub fn new(config: &DictionaryConfig) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ScrapeError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ScrapeError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            parser: CardParser::new()?,
        })
    }

    /// Page for `query`, percent-encoded as a single path segment
    pub fn page_url(&self, query: &str) -> Result<Url, ScrapeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ScrapeError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(query);
        Ok(url)
    }

    async fn fetch_page(&self, query: &str) -> Result<String, ScrapeError> {
        let url = self.page_url(query)?;
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Dictionary for SigureDictionary {
    async fn lookup(&self, query: &str) -> Result<Vec<WordEntry>, ScrapeError> {
        let body = self.fetch_page(query).await?;
        let entries = self.parser.parse(&body);
        tracing::debug!("'{}': {} card(s)", query, entries.len());
        Ok(entries)
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "Sigure".to_string(),
            base_url: self.base_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="word-card">
            <span class="word-card__word"> 猫 </span>
            <span class="word-card__kana">ねこ</span>
            <span class="word-card__badge--accent">1</span>
            <span class="word-card__badge--part">名詞</span>
            <span class="word-card__badge--level">N5</span>
            <p class="word-card__translation-text">貓</p>
            <p class="word-card__translation-text">貓科動物</p>
            <ul class="word-card__examples-list">
              <li><span class="example-jp">猫がいます。</span><span class="example-ch">有一隻貓。</span></li>
              <li><span class="example-jp"></span><span class="example-ch">孤兒翻譯</span></li>
            </ul>
          </div>
          <div class="word-card">
            <span class="word-card__word">猫舌</span>
            <span class="word-card__kana">ねこじた</span>
          </div>
          <div class="word-card"><span class="word-card__kana">なし</span></div>
        </body></html>
    "#;

    #[test]
    fn extracts_cards_with_fixed_selectors() {
        let entries = CardParser::new().unwrap().parse(PAGE);

        assert_eq!(entries.len(), 2);

        let cat = &entries[0];
        assert_eq!(cat.word, "猫");
        assert_eq!(cat.reading, "ねこ");
        assert_eq!(cat.accent, "1");
        assert_eq!(cat.part, "名詞");
        assert_eq!(cat.level, "N5");
        assert_eq!(cat.meaning, "貓");
        assert_eq!(
            cat.examples,
            vec![Example {
                jap: "猫がいます。".to_string(),
                cht: "有一隻貓。".to_string(),
            }]
        );

        let tongue = &entries[1];
        assert_eq!(tongue.word, "猫舌");
        assert!(tongue.examples.is_empty());
        assert!(tongue.meaning.is_empty());
    }

    #[test]
    fn page_without_cards_is_empty() {
        let entries = CardParser::new()
            .unwrap()
            .parse("<html><body><p>見つかりません</p></body></html>");
        assert!(entries.is_empty());
    }

    #[test]
    fn query_is_encoded_as_one_segment() {
        let dict = SigureDictionary::new(&DictionaryConfig::default()).unwrap();

        let url = dict.page_url("猫").unwrap();
        assert_eq!(url.as_str(), "https://www.sigure.tw/dict/jp/%E7%8C%AB");

        let url = dict.page_url("a/b").unwrap();
        assert_eq!(url.as_str(), "https://www.sigure.tw/dict/jp/a%2Fb");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let config = DictionaryConfig {
            base_url: "mailto:someone".to_string(),
            ..DictionaryConfig::default()
        };
        assert!(matches!(
            SigureDictionary::new(&config),
            Err(ScrapeError::InvalidUrl(_))
        ));
    }
}
