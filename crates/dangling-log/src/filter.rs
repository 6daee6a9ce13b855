use core::str::FromStr;

use rustc_hash::FxHashMap;

use compact_str::CompactString;

use crate::Level;

/// Per-module level filter.
///
/// Parsed from a comma separated list where each entry is either a bare level,
/// which sets the base level, or `module=level`. Entries with an unknown level
/// are skipped. When a module is listed more than once, the least verbose level
/// is kept.
#[derive(Clone, Debug)]
pub struct Filter {
    target_levels: FxHashMap<CompactString, Level>,
    base_level: Level,
}

impl Default for Filter {

    fn default() -> Self {
        Self {
            target_levels: FxHashMap::default(),
            base_level: Level::Error,
        }
    }
}

impl Filter {

    pub fn parse(spec: &str) -> Self {
        let mut filter = Self::default();
        for arg in spec.split(',') {
            let (module, level) = match arg.find('=') {
                Some(j) => (Some(arg[..j].trim()), arg[j + 1..].trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            if let Some(module) = module {
                let entry = filter.target_levels
                    .entry(CompactString::new(module))
                    .or_insert(level);
                *entry = (*entry).min(level);
            } else {
                filter.base_level = level;
            }
        }
        filter
    }

    /// Reads `RUST_LOG`, falling back to errors only.
    pub fn from_env() -> Self {
        std::env::var("RUST_LOG")
            .map(|env| Self::parse(&env))
            .unwrap_or_default()
    }

    #[inline(always)]
    pub fn base_level(&self) -> Level {
        self.base_level
    }

    /// Level for `target`, walking up its `::` separated module path.
    pub fn level_for(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[0..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }

    #[inline(always)]
    pub fn enabled(&self, target: &str, level: Level) -> bool {
        level <= self.level_for(target)
    }
}
