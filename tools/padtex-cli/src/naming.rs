use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

const MONSTER_PREFIX: &str = "MONS_";
const MONSTER_ID_WIDTH: usize = 5;

/// Hands out output file names, numbering repeated names.
///
/// No name is handed out twice, so every texture of a run gets its own file.
#[derive(Debug, Default)]
pub struct OutputNames {
    /// Uses of each padded name so far.
    uses: HashMap<String, u32>,
    assigned: HashSet<String>,
}

impl OutputNames {
    /// Returns the file name to use for a texture called `suggested`.
    ///
    /// The first use of a name keeps it; later uses become `stem (n).ext`,
    /// skipping any `n` whose name was already handed out.
    pub fn assign(&mut self, suggested: &str) -> String {
        let name = pad_monster_id(suggested);
        let uses = self.uses.entry(name.clone()).or_insert(0);

        let mut candidate = if *uses == 0 {
            name.clone()
        } else {
            numbered(&name, *uses)
        };
        while self.assigned.contains(&candidate) {
            *uses += 1;
            candidate = numbered(&name, *uses);
        }
        *uses += 1;

        self.assigned.insert(candidate.clone());
        candidate
    }
}

fn numbered(name: &str, n: u32) -> String {
    let (stem, extension) = split_extension(name);
    format!("{stem} ({n}){extension}")
}

/// True when `name` is a relative path that stays below the output folder.
pub fn is_contained(name: &str) -> bool {
    let path = Path::new(name);
    path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Zero-pads the number of `MONS_<digits>.<ext>` names to five digits.
pub fn pad_monster_id(name: &str) -> String {
    let Some(prefix) = name.get(..MONSTER_PREFIX.len()) else {
        return name.to_string();
    };
    if !prefix.eq_ignore_ascii_case(MONSTER_PREFIX) {
        return name.to_string();
    }

    let rest = &name[MONSTER_PREFIX.len()..];
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let suffix = &rest[digits..];
    if digits == 0 || !suffix.starts_with('.') || suffix.len() < 2 {
        return name.to_string();
    }

    format!(
        "{prefix}{:0>width$}{suffix}",
        &rest[..digits],
        width = MONSTER_ID_WIDTH
    )
}

/// Splits at the last dot of the final path component. Leading dots do not
/// start an extension.
fn split_extension(name: &str) -> (&str, &str) {
    let base_start = name.rfind('/').map_or(0, |i| i + 1);
    let base = &name[base_start..];
    match base.rfind('.') {
        Some(dot) if base[..dot].bytes().any(|b| b != b'.') => name.split_at(base_start + dot),
        _ => (name, ""),
    }
}
