//! Navigation bar highlighting and the hero parallax offset

/// Total parallax travel in pixels across the hero
const PARALLAX_RANGE: f64 = 20.0;

fn is_who_me_page(path: &str) -> bool {
    path.ends_with("who-me.html") || path.ends_with("who-me")
}

/// Indices of the nav links to mark active for the current location
///
/// On the who-me page that is every link pointing at it. Elsewhere a link
/// is active when its fragment names the current hash, `#home` when the
/// location has none.
pub fn active_links<S: AsRef<str>>(path: &str, hash: &str, hrefs: &[S]) -> Vec<usize> {
    let hash = if hash.is_empty() { "#home" } else { hash };
    let hash_name = match hash.trim_start_matches('#') {
        "" => "home",
        name => name,
    };
    let who_me = is_who_me_page(path);

    hrefs
        .iter()
        .enumerate()
        .filter(|(_, href)| {
            let href = href.as_ref();
            if who_me {
                return href.contains("who-me");
            }
            let link_hash = href.split('#').nth(1).unwrap_or("");
            link_hash == hash_name || href == hash
        })
        .map(|(i, _)| i)
        .collect()
}

/// Screen-space box of the hero element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Translation for the hero shapes given the pointer position
pub fn parallax_offset(pointer: (f64, f64), bounds: &Bounds) -> (f64, f64) {
    let axis = |pos: f64, start: f64, size: f64| {
        if size <= 0.0 {
            0.0
        } else {
            ((pos - start) / size - 0.5) * PARALLAX_RANGE
        }
    };
    (
        axis(pointer.0, bounds.left, bounds.width),
        axis(pointer.1, bounds.top, bounds.height),
    )
}
