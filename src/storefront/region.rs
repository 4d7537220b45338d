use super::error::{Result, StorefrontError};

/// Every locale the PlayStation Store serves.
pub const REGIONS: &[&str] = &[
    "ar-AE", "ar-BH", "ar-KW", "ar-LB", "ar-OM", "ar-QA", "ar-SA", "ch-HK", "ch-TW", "cs-CZ",
    "da-DK", "de-AT", "de-CH", "de-DE", "de-LU", "el-GR", "en-AE", "en-AR", "en-AU", "en-BG",
    "en-BH", "en-BR", "en-CA", "en-CL", "en-CO", "en-CR", "en-CY", "en-CZ", "en-DK", "en-EC",
    "en-ES", "en-FI", "en-GB", "en-GR", "en-HK", "en-HR", "en-HU", "en-ID", "en-IL", "en-IN",
    "en-IS", "en-KW", "en-LB", "en-MT", "en-MX", "en-MY", "en-NO", "en-NZ", "en-OM", "en-PA",
    "en-PE", "en-PL", "en-QA", "en-RO", "en-SA", "en-SE", "en-SG", "en-SI", "en-SK", "en-TH",
    "en-TR", "en-TW", "en-US", "en-ZA", "es-AR", "es-BR", "es-CL", "es-CO", "es-CR", "es-EC",
    "es-ES", "es-GT", "es-HN", "es-MX", "es-PA", "es-PE", "es-PY", "es-SV", "fi-FI", "fr-BE",
    "fr-CA", "fr-CH", "fr-FR", "fr-LU", "hu-HU", "id-ID", "it-CH", "it-IT", "ja-JP", "ko-KR",
    "nl-BE", "nl-NL", "no-NO", "pl-PL", "pt-BR", "pt-PT", "ro-RO", "ru-RU", "ru-UA", "sv-SE",
    "th-TH", "tr-TR", "vi-VN", "zh-CN", "zh-HK", "zh-TW",
];

/// A storefront locale such as `en-US`.  Only constructible from [`REGIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region(&'static str);

impl Region {
    pub fn parse(code: &str) -> Result<Self> {
        REGIONS
            .iter()
            .copied()
            .find(|known| *known == code)
            .map(Region)
            .ok_or_else(|| StorefrontError::InvalidRegion(code.to_owned()))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// The store's catalog URLs spell `en-US` as `en/US`.
    pub fn as_path(&self) -> String {
        self.0.replace('-', "/")
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Region list laid out for a chat message, `per_line` codes per line.
pub fn region_table(per_line: usize) -> String {
    REGIONS
        .chunks(per_line.max(1))
        .map(|line| line.join(", "))
        .collect::<Vec<_>>()
        .join("\n")
}
