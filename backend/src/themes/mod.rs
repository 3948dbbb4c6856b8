use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::fs;

use crate::utils::letters::{is_puzzle_word, normalize_word};

/// Named word lists a game can be played with
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: BTreeMap<String, Vec<String>>,
}

impl ThemeCatalog {
    /// The themes shipped with the game
    pub fn builtin() -> Self {
        Self::from_map([
            ("dinosaurs", vec!["TREX", "BONE", "CLAW", "SCALE"]),
            ("space", vec!["STAR", "MOON", "MARS", "ROCKET"]),
            ("ocean", vec!["FISH", "WAVE", "SHARK", "CORAL"]),
        ])
    }

    /// Load themes from a JSON object of `{"theme": ["WORD", ...]}`
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read themes from {}", path.display()))?;
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON object of word lists", path.display()))?;

        let catalog = Self::from_map(raw);
        if catalog.is_empty() {
            bail!("{} does not define any themes with words", path.display());
        }

        tracing::info!("Loaded {} themes from {}", catalog.len(), path.display());

        Ok(catalog)
    }

    /// Build a catalog, uppercasing words and dropping blank ones. Words with
    /// anything but A-Z letters are dropped with a warning, and themes left
    /// without words are skipped.
    pub fn from_map<I, K, W, S>(themes: I) -> Self
    where
        I: IntoIterator<Item = (K, W)>,
        K: Into<String>,
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let themes = themes
            .into_iter()
            .map(|(name, words)| {
                let name = name.into().trim().to_lowercase();
                let words: Vec<String> = words
                    .into_iter()
                    .map(|w| normalize_word(w.as_ref()))
                    .filter(|w| !w.is_empty())
                    .filter(|w| {
                        let valid = is_puzzle_word(w);
                        if !valid {
                            tracing::warn!("Dropping '{}' from theme {}: not A-Z letters", w, name);
                        }
                        valid
                    })
                    .collect();
                (name, words)
            })
            .filter(|(name, words)| !name.is_empty() && !words.is_empty())
            .collect();

        Self { themes }
    }

    /// Drop words that cannot fit a `size` x `size` grid, then any theme left
    /// empty
    pub fn fit_to_grid(mut self, size: usize) -> Self {
        for (name, words) in self.themes.iter_mut() {
            words.retain(|w| {
                let fits = w.chars().count() <= size;
                if !fits {
                    tracing::warn!(
                        "Dropping '{}' from theme {}: longer than the {}x{} grid",
                        w,
                        name,
                        size,
                        size
                    );
                }
                fits
            });
        }
        self.themes.retain(|_, words| !words.is_empty());
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.themes.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Theme names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.themes
            .iter()
            .map(|(name, words)| (name.as_str(), words.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("themes-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_builtin_themes() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["dinosaurs", "ocean", "space"]);
        assert_eq!(
            catalog.get("dinosaurs").unwrap(),
            &["TREX", "BONE", "CLAW", "SCALE"]
        );
        assert!(!catalog.contains("jungle"));
    }

    #[test]
    fn test_from_map_normalizes() {
        let catalog = ThemeCatalog::from_map([
            (" Farm ", vec!["cow", " pig ", ""]),
            ("empty", vec!["  "]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("farm").unwrap(), &["COW", "PIG"]);
    }

    #[test]
    fn test_from_map_drops_invalid_words() {
        let catalog = ThemeCatalog::from_map([
            ("dinosaurs", vec!["T-REX", "bone", "claw 2"]),
            ("broken", vec!["R2D2", "C-3PO"]),
        ]);
        assert_eq!(catalog.get("dinosaurs").unwrap(), &["BONE"]);
        assert!(!catalog.contains("broken"), "a theme with no usable words is skipped");
    }

    #[test]
    fn test_fit_to_grid() {
        let catalog = ThemeCatalog::from_map([
            ("mixed", vec!["CAT", "ELEPHANTS"]),
            ("long", vec!["PALEONTOLOGY"]),
        ])
        .fit_to_grid(8);

        assert_eq!(catalog.get("mixed").unwrap(), &["CAT"]);
        assert!(!catalog.contains("long"));
        assert_eq!(ThemeCatalog::builtin().fit_to_grid(8).len(), 3);
    }

    #[tokio::test]
    async fn test_load_drops_unplayable_words() {
        let path = temp_file(r#"{"dinosaurs": ["T-REX", "raptor"], "bad": ["???"]}"#);
        let catalog = ThemeCatalog::load(&path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["dinosaurs"]);
        assert_eq!(catalog.get("dinosaurs").unwrap(), &["RAPTOR"]);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = temp_file(r#"{"weather": ["rain", "snow", "hail"]}"#);
        let catalog = ThemeCatalog::load(&path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.get("weather").unwrap(), &["RAIN", "SNOW", "HAIL"]);
    }

    #[tokio::test]
    async fn test_load_rejects_empty_catalog() {
        let path = temp_file("{}");
        let result = ThemeCatalog::load(&path).await;
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = ThemeCatalog::load("/definitely/not/here/themes.json").await;
        assert!(result.is_err());
    }
}
