//! Canonicalization: `normalize(raw, base) -> canonical`.

use linkchecker_types::Scheme;

use crate::errors::NormalizeError;

/// The result of normalizing a raw reference.
///
/// `canonical` never carries a fragment — the fragment is split out into
/// `anchor` so that two URLs differing only by fragment share a cache key
/// unless anchor checking is enabled higher up the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub scheme: Scheme,
    pub canonical: String,
    pub anchor: Option<String>,
}

/// Resolve `raw` against `base` (if any), then canonicalize:
///
/// - lowercase scheme and host (handled by the `url` crate itself),
/// - elide the scheme's default port,
/// - normalize `.`/`..` path segments (handled by `url::Url::join`),
/// - percent-encode only the bytes the URL syntax requires,
/// - strip the fragment into `anchor`.
///
/// # Errors
/// Returns [`NormalizeError`] if `base` or `raw` do not parse as URLs.
pub fn normalize(raw: &str, base: Option<&str>) -> Result<Normalized, NormalizeError> {
    let mut url = match base {
        Some(base) => {
            let base_url = url::Url::parse(base).map_err(NormalizeError::InvalidBase)?;
            base_url.join(raw).map_err(NormalizeError::InvalidUrl)?
        }
        None => url::Url::parse(raw).map_err(NormalizeError::InvalidUrl)?,
    };

    let scheme = Scheme::parse(url.scheme());
    elide_default_port(&mut url, scheme);

    let anchor = url.fragment().map(ToString::to_string);
    url.set_fragment(None);

    Ok(Normalized {
        scheme,
        canonical: url.to_string(),
        anchor,
    })
}

/// `url::Url` only elides default ports for its built-in "special" schemes
/// (http/https/ftp/file/ws/wss). NNTP and telnet are not special schemes to
/// the `url` crate, so their default ports survive `Url::join` verbatim;
/// strip them here against our own port-elision table instead.
fn elide_default_port(url: &mut url::Url, scheme: Scheme) {
    if let (Some(port), Some(default)) = (url.port(), scheme.default_port())
        && port == default
    {
        let _ = url.set_port(None);
    }
}
