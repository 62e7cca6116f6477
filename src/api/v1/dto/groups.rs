/*
 * Responsibility
 * - Response DTO of the groups endpoint: `{ "<@odata.type>": "<displayName>" }`
 * - Reduction from Graph memberOf entries
 */
use std::collections::BTreeMap;

use crate::services::graph::DirectoryObject;

pub type GroupsResponse = BTreeMap<String, String>;

/// Map each membership's `@odata.type` to its `displayName`.
///
/// Entries missing either field are dropped. When several entries share a
/// type the last one wins, so the result is at most as long as the input.
pub fn reduce_memberships<I>(objects: I) -> GroupsResponse
where
    I: IntoIterator<Item = DirectoryObject>,
{
    let mut groups = GroupsResponse::new();
    for object in objects {
        if let (Some(kind), Some(name)) = (object.odata_type, object.display_name) {
            groups.insert(kind, name);
        }
    }
    groups
}
