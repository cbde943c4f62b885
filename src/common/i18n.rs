// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;

pub const DEFAULT_LANGUAGE: &str = "en";

// Catálogos embutidos no binário
const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Mensagens traduzidas, indexadas por idioma e depois por código de erro.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();

        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("Catálogo de idioma inválido: {}", lang))?;
            catalogs.insert(lang.to_string(), messages);
        }

        Ok(Self {
            catalogs: Arc::new(catalogs),
        })
    }

    /// Idioma pedido -> inglês -> a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .or_else(|| {
                self.catalogs
                    .get(DEFAULT_LANGUAGE)
                    .and_then(|messages| messages.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_to_requested_language() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("pt", "user_not_found"), "Usuário não encontrado.");
    }

    #[test]
    fn falls_back_to_english_for_unknown_language() {
        let store = I18nStore::load().unwrap();
        assert!(!store.supports("de"));
        assert_eq!(store.translate("de", "user_not_found"), "User not found.");
    }

    #[test]
    fn falls_back_to_key_when_missing_everywhere() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("en", "no_such_key"), "no_such_key");
    }

    #[test]
    fn every_catalog_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let english = &store.catalogs["en"];
        for (lang, messages) in store.catalogs.iter() {
            for key in english.keys() {
                assert!(messages.contains_key(key), "{} sem a chave {}", lang, key);
            }
        }
    }
}
