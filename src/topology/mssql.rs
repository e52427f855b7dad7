use std::f64::consts::PI;

use super::LayoutBuilder;
use crate::models::{AgReplica, CommitTier, LayoutRole, NodeRecord, SyncState};

const SYNCHRONOUS_COMMIT: &str = "SYNCHRONOUS_COMMIT";
const ASYNCHRONOUS_COMMIT: &str = "ASYNCHRONOUS_COMMIT";

/// Posun followerů, aby žádný neležel přesně na svislici hub - listener
const FOLLOWER_ANGLE_OFFSET: f64 = PI / 6.0;

/// AlwaysOn role a stav synchronizace jednoho nodu
#[derive(Debug, Default, PartialEq)]
struct ResolvedReplica {
    role: Option<String>,
    availability_mode: Option<String>,
    synchronization_state: Option<String>,
}

/// AlwaysOn availability group: PRIMARY ve středu, listener nad ním,
/// SECONDARY repliky na kružnici posunuté o π/6
pub(super) fn layout(builder: &mut LayoutBuilder<'_>, nodes: &[&NodeRecord]) {
    let replica_list = collect_replica_list(nodes);

    let mut hub: Option<&NodeRecord> = None;
    let mut secondaries: Vec<(&NodeRecord, ResolvedReplica)> = Vec::new();
    let mut overflow: Vec<&NodeRecord> = Vec::new();

    for &node in nodes {
        let resolved = resolve(node, &replica_list);
        match resolved.role.as_deref() {
            Some("PRIMARY") if hub.is_none() => hub = Some(node),
            Some("SECONDARY") => secondaries.push((node, resolved)),
            _ => overflow.push(node),
        }
    }

    let hub_id = hub.map(|h| builder.place_hub(h));
    if hub_id.is_none() {
        tracing::debug!("No PRIMARY replica in availability group, laying out without edges");
    }

    let listener_id = nodes.iter().find_map(|n| n.listener.as_deref()).map(|name| {
        let cluster_id = hub.into_iter().chain(nodes.iter().copied()).find_map(|n| n.cluster_id.clone());
        place_listener(builder, name, cluster_id)
    });

    let radius = builder.geometry.follower_radius;
    let follower_nodes: Vec<&NodeRecord> = secondaries.iter().map(|(node, _)| *node).collect();
    let secondary_ids = builder.ring(&follower_nodes, LayoutRole::Secondary, radius, FOLLOWER_ANGLE_OFFSET);
    builder.overflow(&overflow);

    let Some(hub_id) = hub_id else {
        return;
    };

    if let Some(listener_id) = listener_id {
        builder.edge(&listener_id, &hub_id, SyncState::Listener, "listener".to_string());
    }

    for ((_, replica), id) in secondaries.iter().zip(&secondary_ids) {
        let mode = replica.availability_mode.as_deref();
        let state = replica.synchronization_state.as_deref();
        builder.edge(
            &hub_id,
            id,
            SyncState::Commit(commit_tier(mode, state)),
            commit_label(mode, state),
        );
    }
}

/// Commit mód + stav synchronizace databáze -> jedno ze čtyř pásem
pub fn commit_tier(mode: Option<&str>, state: Option<&str>) -> CommitTier {
    match (mode, state) {
        (Some(SYNCHRONOUS_COMMIT), Some("SYNCHRONIZED")) => CommitTier::Synchronized,
        (Some(SYNCHRONOUS_COMMIT), Some("SYNCHRONIZING")) => CommitTier::Synchronizing,
        (Some(ASYNCHRONOUS_COMMIT), Some("SYNCHRONIZING" | "SYNCHRONIZED")) => CommitTier::Asynchronous,
        _ => CommitTier::NotSynchronizing,
    }
}

fn commit_label(mode: Option<&str>, state: Option<&str>) -> String {
    match (mode, state) {
        (Some(mode), Some(state)) => format!("{} / {}", mode, state),
        (Some(mode), None) => mode.to_string(),
        (None, Some(state)) => state.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Sjednocený replica list ze všech nodů, první výskyt serveru vyhrává
fn collect_replica_list<'n>(nodes: &[&'n NodeRecord]) -> Vec<&'n AgReplica> {
    let mut list: Vec<&AgReplica> = Vec::new();
    for replica in nodes.iter().flat_map(|n| n.ag_replicas.iter()) {
        let known = list
            .iter()
            .any(|r| r.replica_server_name.eq_ignore_ascii_case(&replica.replica_server_name));
        if !known {
            list.push(replica);
        }
    }
    list
}

/// Pokud existuje replica list, rozhoduje on; jinak role z NodeStatus.
/// Node, který v listu není, nemá roli a skončí v overflow.
fn resolve(node: &NodeRecord, replica_list: &[&AgReplica]) -> ResolvedReplica {
    if replica_list.is_empty() {
        return ResolvedReplica {
            role: node.role.clone(),
            availability_mode: node.availability_mode.clone(),
            synchronization_state: node.synchronization_state.clone(),
        };
    }

    match find_replica(replica_list, &node.hostname) {
        Some(entry) => ResolvedReplica {
            role: entry.role.clone(),
            availability_mode: entry.availability_mode.clone().or_else(|| node.availability_mode.clone()),
            synchronization_state: entry
                .synchronization_state
                .clone()
                .or_else(|| node.synchronization_state.clone()),
        },
        None => ResolvedReplica::default(),
    }
}

/// Přesná shoda jména (bez ohledu na velikost písmen) má přednost.
/// Krátké jméno ("SQL-01" vs "sql-01.corp.local" nebo "SQL-01\INST")
/// se použije jen když je v listu jednoznačné.
fn find_replica<'r>(replica_list: &[&'r AgReplica], hostname: &str) -> Option<&'r AgReplica> {
    if let Some(exact) = replica_list
        .iter()
        .find(|r| r.replica_server_name.eq_ignore_ascii_case(hostname))
    {
        return Some(*exact);
    }

    let host = short_name(hostname);
    let mut matches = replica_list
        .iter()
        .filter(|r| short_name(&r.replica_server_name) == host);
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(*only),
        (Some(_), Some(_)) => {
            tracing::debug!("Ambiguous short name match for {} in replica list", hostname);
            None
        }
        _ => None,
    }
}

fn short_name(name: &str) -> String {
    name.split(['.', '\\']).next().unwrap_or(name).to_lowercase()
}

fn place_listener(builder: &mut LayoutBuilder<'_>, name: &str, cluster_id: Option<String>) -> String {
    let mut payload = NodeRecord::new(name);
    payload.cluster_id = cluster_id;
    payload.role = Some("LISTENER".to_string());
    payload.listener = Some(name.to_string());

    let x = builder.geometry.center_x;
    let y = builder.geometry.center_y - builder.geometry.listener_offset;
    builder.place_as(&format!("listener:{}", name), payload, LayoutRole::Listener, x, y)
}
