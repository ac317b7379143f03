//! Log subscriber setup.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "glance=info";

/// Install the global fmt subscriber. `RUST_LOG` is honoured, with
/// `directive` (default `glance=info`) added on top. Calling this twice is
/// harmless; the first subscriber stays.
pub fn init(directive: Option<&str>) {
    let filter = EnvFilter::from_default_env().add_directive(parse_directive(
        directive.unwrap_or(DEFAULT_DIRECTIVE),
    ));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Parse a filter directive, falling back to the default on bad input.
pub fn parse_directive(directive: &str) -> Directive {
    directive.parse().unwrap_or_else(|e| {
        eprintln!("invalid log directive {directive:?} ({e}), using {DEFAULT_DIRECTIVE}");
        default_directive()
    })
}

fn default_directive() -> Directive {
    DEFAULT_DIRECTIVE
        .parse()
        .expect("default log directive is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_directive_is_kept() {
        assert_eq!(
            parse_directive("glance_bridge=debug").to_string(),
            "glance_bridge=debug"
        );
    }

    #[test]
    fn invalid_directive_falls_back() {
        assert_eq!(
            parse_directive("glance=loud").to_string(),
            default_directive().to_string()
        );
    }

    #[test]
    fn init_twice_is_harmless() {
        init(None);
        init(Some("glance=debug"));
    }
}
