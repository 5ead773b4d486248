//! Translation catalog

use std::sync::{Mutex, PoisonError};

use crate::models::Locale;

/// Switches the active translation locale.
pub trait Translator {
    fn change_language(&self, locale: &Locale);
}

const EN: &[(&str, &str)] = &[
    ("common.resources", "Resources"),
    ("resource.fetching-data", "Fetching data..."),
    ("resource.unused-resources", "Unused resources"),
    ("resource.no-unused-resources", "No unused resources."),
    ("resource.delete-all-unused", "Delete all unused resources"),
    (
        "resource.delete-all-unused-confirm",
        "Are you sure to delete all unused resources? This action cannot be undone.",
    ),
    ("resource.deleted", "Deleted"),
    ("resource.delete-failed", "Failed to delete"),
    ("message.no-data", "No data found."),
    ("setting.appearance", "Appearance"),
    ("setting.language", "Language"),
];

const ZH_HANS: &[(&str, &str)] = &[
    ("common.resources", "资源库"),
    ("resource.fetching-data", "正在获取数据..."),
    ("resource.unused-resources", "未使用的资源"),
    ("resource.no-unused-resources", "没有未使用的资源。"),
    ("resource.delete-all-unused", "删除所有未使用的资源"),
    (
        "resource.delete-all-unused-confirm",
        "确定要删除所有未使用的资源吗？此操作无法撤销。",
    ),
    ("resource.deleted", "已删除"),
    ("resource.delete-failed", "删除失败"),
    ("message.no-data", "暂无数据。"),
    ("setting.appearance", "外观"),
    ("setting.language", "语言"),
];

/// Built-in message table with an active locale.
#[derive(Debug, Default)]
pub struct Catalog {
    active: Mutex<Locale>,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self {
            active: Mutex::new(locale),
        }
    }

    pub fn active_locale(&self) -> Locale {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up `key` in the active locale, falling back to English and then
    /// to the key itself.
    pub fn translate(&self, key: &str) -> String {
        let locale = self.active_locale();
        lookup(table_for(&locale), key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
            .to_string()
    }
}

impl Translator for Catalog {
    fn change_language(&self, locale: &Locale) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = locale.clone();
        tracing::debug!("Active translation locale set to {}", locale);
    }
}

fn table_for(locale: &Locale) -> &'static [(&'static str, &'static str)] {
    match locale.language() {
        "zh" => ZH_HANS,
        _ => EN,
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(entry, _)| *entry == key)
        .map(|(_, message)| *message)
}
