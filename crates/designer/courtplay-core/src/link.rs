//! Share links: the page URL plus a `?play=<shareId>` query parameter.

use url::Url;

use crate::share::ShareError;

/// Query parameter carrying the share id.
pub const SHARE_PARAM: &str = "play";

/// Link for `share_id` based on the page's origin and path. The page's own
/// query string and fragment are dropped.
pub fn share_url(page_url: &str, share_id: &str) -> Result<String, ShareError> {
    let mut url = Url::parse(page_url)?;
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut().append_pair(SHARE_PARAM, share_id);
    Ok(url.into())
}

/// Share id carried by `url`, if any. Unparseable URLs and empty values yield `None`.
pub fn shared_play_id(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let id = url
        .query_pairs()
        .find(|(k, _)| k == SHARE_PARAM)
        .map(|(_, v)| v.into_owned())?;
    (!id.is_empty()).then_some(id)
}

#[inline]
pub fn is_shared_play_url(url: &str) -> bool {
    shared_play_id(url).is_some()
}

/// `url` without the share parameter; other parameters and the fragment are kept.
pub fn clear_shared_play_param(url: &str) -> Result<String, ShareError> {
    let mut parsed = Url::parse(url)?;
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != SHARE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }
    Ok(parsed.into())
}
