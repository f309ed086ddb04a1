//! Profile data: CRUD over education/work/language rows and the
//! [`snapshot::ProfileSnapshot`] projection the decision engines consume.

pub mod snapshot;

use anyhow::Result;

use crate::storage::Storage;
use snapshot::ProfileSnapshot;

/// Load a fresh snapshot for a user. A user without a profile row yields a
/// snapshot with empty collections.
pub async fn load_snapshot(storage: &Storage, user_id: &str) -> Result<Option<ProfileSnapshot>> {
    let Some(user) = storage.get_user(user_id).await? else {
        return Ok(None);
    };

    let (education, work, languages) = match storage.get_profile_by_user(user_id).await? {
        Some(profile) => (
            storage.list_education(&profile.id).await?,
            storage.list_work(&profile.id).await?,
            storage.list_languages(&profile.id).await?,
        ),
        None => (vec![], vec![], vec![]),
    };

    Ok(Some(ProfileSnapshot::build(
        &user, &education, &work, &languages,
    )))
}
