// build.rs

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_LANG: &str = "en";

fn main() {
    let lang = select_language();
    println!("cargo:rustc-env=MTC_LANG_EFFECTIVE={}", lang);

    println!("cargo:rerun-if-env-changed=MTC_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=locales/");

    // English is always loaded first so a partial catalogue still compiles.
    let mut catalogue = load_catalogue(FALLBACK_LANG)
        .expect("Failed to read fallback language file: locales/en.toml");

    if lang != FALLBACK_LANG {
        match load_catalogue(&lang) {
            Some(specific) => catalogue.extend(specific),
            None => println!(
                "cargo:warning=Language file 'locales/{}.toml' not found. Falling back to '{}'.",
                lang, FALLBACK_LANG
            ),
        }
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("translations.rs");
    fs::write(&dest_path, render_macro(&catalogue)).expect("Failed to write translations.rs");
}

/// `lang_*` feature flags win over `MTC_LANG`, which wins over English.
fn select_language() -> String {
    let mut active_langs: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    active_langs.sort();

    match active_langs.first() {
        Some(first) => {
            if active_langs.len() > 1 {
                println!(
                    "cargo:warning=Multiple language features enabled ({:?}). Using '{}'.",
                    active_langs, first
                );
            }
            first.clone()
        }
        None => env::var("MTC_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string()),
    }
}

fn load_catalogue(lang: &str) -> Option<BTreeMap<String, String>> {
    let path = format!("locales/{}.toml", lang);
    let content = fs::read_to_string(&path).ok()?;
    let parsed = toml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e));
    Some(parsed)
}

/// Generates a `t!` macro with one arm per key, expanding to a string literal.
fn render_macro(catalogue: &BTreeMap<String, String>) -> String {
    let mut code = String::from("#[macro_export]\nmacro_rules! t {\n");
    for (key, value) in catalogue {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, escaped));
    }
    code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    code.push('}');
    code
}
