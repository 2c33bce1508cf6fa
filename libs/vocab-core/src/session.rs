//! Practice session building on top of due-item selection.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::selector::select_due;
use crate::types::{EffectiveSettings, Item};

/// Pick the items for one practice session.
///
/// Fails with [`Error::NotEnoughItems`] when fewer than
/// `minimum_session_size` items are due, rather than running a short session.
pub fn build_session<'a>(
    items: &'a [Item],
    now: DateTime<Utc>,
    settings: &EffectiveSettings,
) -> Result<Vec<&'a Item>> {
    settings.validate()?;

    let mut due = select_due(items, now);
    if due.len() < settings.minimum_session_size {
        tracing::warn!(
            available = due.len(),
            required = settings.minimum_session_size,
            "not enough due items for a session"
        );
        return Err(Error::NotEnoughItems {
            available: due.len(),
            required: settings.minimum_session_size,
        });
    }

    due.truncate(settings.session_size);
    Ok(due)
}
