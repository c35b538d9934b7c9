use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::color::resolver::DEFAULT_PALETTE;
use crate::color::token::ColorToken;
use crate::foundation::error::{PlotshotError, PlotshotResult};

/// Name of the theme every lookup falls back to.
pub const DEFAULT_THEME: &str = "default";

const DARK_PALETTE: [&str; 9] = [
    "#4992ff", "#7cffb2", "#fddd60", "#ff6e76", "#58d9f9", "#05c091", "#ff8a45", "#8d48e3",
    "#dd79ff",
];

/// Non-empty ordered list of series colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<ColorToken>,
}

impl Palette {
    /// Build a palette; fails when `colors` is empty.
    pub fn new(colors: Vec<ColorToken>) -> PlotshotResult<Self> {
        if colors.is_empty() {
            return Err(PlotshotError::invalid_input("palette must contain at least one color"));
        }
        Ok(Self { colors })
    }

    fn from_static(colors: &[&str]) -> Self {
        Self {
            colors: colors.iter().copied().map(ColorToken::from).collect(),
        }
    }

    /// Colors in declaration order.
    pub fn colors(&self) -> &[ColorToken] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_static(&DEFAULT_PALETTE)
    }
}

/// A named palette plus the chrome colors a gateway needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as looked up by widgets and requests.
    pub name: String,
    /// Series palette.
    pub palette: Palette,
    /// Canvas background.
    pub background: ColorToken,
    /// Grid line color.
    pub grid_line: ColorToken,
}

impl Theme {
    /// Built-in light theme backed by [`DEFAULT_PALETTE`].
    pub fn default_light() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
            palette: Palette::default(),
            background: ColorToken::from("#ffffff"),
            grid_line: ColorToken::from("#e0e6f1"),
        }
    }

    /// Built-in dark alternate.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            palette: Palette::from_static(&DARK_PALETTE),
            background: ColorToken::from("#100c2a"),
            grid_line: ColorToken::from("#484753"),
        }
    }
}

/// Immutable set of themes, loaded once at startup.
#[derive(Clone, Debug)]
pub struct ThemeSet {
    default: Theme,
    themes: BTreeMap<String, Theme>,
}

impl Default for ThemeSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeFileEntry {
    color: Vec<ColorToken>,
    #[serde(default)]
    background_color: Option<ColorToken>,
    #[serde(default)]
    grid_line_color: Option<ColorToken>,
}

impl ThemeSet {
    /// The built-in `default` and `dark` themes.
    pub fn builtin() -> Self {
        let mut out = Self {
            default: Theme::default_light(),
            themes: BTreeMap::new(),
        };
        out.insert(Theme::default_light());
        out.insert(Theme::dark());
        out
    }

    fn insert(&mut self, theme: Theme) {
        if theme.name == DEFAULT_THEME {
            self.default = theme.clone();
        }
        self.themes.insert(theme.name.clone(), theme);
    }

    /// Parse a theme file: `{ "<name>": { "color": [hex, ...], "backgroundColor": hex? } }`.
    ///
    /// Built-in themes stay available unless the file redefines them by name.
    pub fn from_json_str(json: &str) -> PlotshotResult<Self> {
        let entries: BTreeMap<String, ThemeFileEntry> =
            serde_json::from_str(json).map_err(|e| PlotshotError::serde(e.to_string()))?;

        let mut out = Self::builtin();
        for (name, entry) in entries {
            for c in &entry.color {
                c.to_rgba8()
                    .map_err(|e| PlotshotError::invalid_input(format!("theme '{name}': {e}")))?;
            }
            let base = out.get(&name).clone();
            let palette = Palette::new(entry.color)
                .map_err(|e| PlotshotError::invalid_input(format!("theme '{name}': {e}")))?;
            let theme = Theme {
                name,
                palette,
                background: entry.background_color.unwrap_or(base.background),
                grid_line: entry.grid_line_color.unwrap_or(base.grid_line),
            };
            out.insert(theme);
        }
        Ok(out)
    }

    /// Read and parse a theme file.
    pub fn load(path: &Path) -> PlotshotResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read theme file '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Like [`ThemeSet::load`], but any failure degrades to [`ThemeSet::builtin`].
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(set) => {
                tracing::info!(path = %path.display(), themes = set.themes.len(), "loaded themes");
                set
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "theme load failed, using built-in palettes"
                );
                Self::builtin()
            }
        }
    }

    /// Look up a theme by name (case-insensitive), falling back to `default`.
    pub fn get(&self, name: &str) -> &Theme {
        self.find(name).unwrap_or(&self.default)
    }

    /// Lookup (exact, then case-insensitive) without the default fallback.
    pub fn find(&self, name: &str) -> Option<&Theme> {
        self.themes
            .get(name)
            .or_else(|| self.themes.values().find(|t| t.name.eq_ignore_ascii_case(name)))
    }

    /// Theme names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/theme.rs"]
mod tests;
