//! Topology validation helpers for throat connection tables.

use std::collections::HashMap;

use crate::network_error::NetworkError;

/// Behavior when a suspicious but usable topology feature is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TopologyIssueHandling {
    /// Emit a `log::warn!` and continue.
    #[default]
    Warn,
    /// Continue silently.
    Ignore,
}

/// Findings of [`check_health`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Pairs `(first, duplicate)` of throats joining the same two pores.
    pub duplicate_throats: Vec<(usize, usize)>,
    /// Pores with no incident throat.
    pub isolated_pores: Vec<usize>,
}

impl HealthReport {
    /// True when no issue was found.
    pub fn is_healthy(&self) -> bool {
        self.duplicate_throats.is_empty() && self.isolated_pores.is_empty()
    }
}

/// Check that every connection references a pore in `0..num_pores` and
/// that no throat joins a pore to itself.
///
/// `first_throat` is the network index of `conns[0]`, used for error reporting.
pub fn validate_connections(
    num_pores: usize,
    conns: &[[usize; 2]],
    first_throat: usize,
) -> Result<(), NetworkError> {
    for (offset, &[p1, p2]) in conns.iter().enumerate() {
        let throat = first_throat + offset;
        for pore in [p1, p2] {
            if pore >= num_pores {
                return Err(NetworkError::InvalidTopology {
                    throat,
                    pore,
                    num_pores,
                });
            }
        }
        if p1 == p2 {
            return Err(NetworkError::SelfLoop { throat, pore: p1 });
        }
    }
    Ok(())
}

/// Return `(first, duplicate)` pairs of throats that join the same unordered pore pair.
pub fn find_duplicate_throats(conns: &[[usize; 2]]) -> Vec<(usize, usize)> {
    let mut first_seen: HashMap<(usize, usize), usize> = HashMap::with_capacity(conns.len());
    let mut duplicates = Vec::new();
    for (throat, &[p1, p2]) in conns.iter().enumerate() {
        let key = (p1.min(p2), p1.max(p2));
        match first_seen.get(&key) {
            Some(&first) => duplicates.push((first, throat)),
            None => {
                first_seen.insert(key, throat);
            }
        }
    }
    duplicates
}

/// Return pores that no throat touches, ascending.
pub fn find_isolated_pores(num_pores: usize, conns: &[[usize; 2]]) -> Vec<usize> {
    let mut touched = vec![false; num_pores];
    for &[p1, p2] in conns {
        if let Some(flag) = touched.get_mut(p1) {
            *flag = true;
        }
        if let Some(flag) = touched.get_mut(p2) {
            *flag = true;
        }
    }
    touched
        .iter()
        .enumerate()
        .filter_map(|(pore, &hit)| (!hit).then_some(pore))
        .collect()
}

/// Run all non-fatal topology checks.
pub fn check_health(
    num_pores: usize,
    conns: &[[usize; 2]],
    handling: TopologyIssueHandling,
) -> HealthReport {
    let report = HealthReport {
        duplicate_throats: find_duplicate_throats(conns),
        isolated_pores: find_isolated_pores(num_pores, conns),
    };
    if handling == TopologyIssueHandling::Warn {
        for &(first, duplicate) in &report.duplicate_throats {
            log::warn!("Duplicate throat detected: throat={duplicate} repeats throat={first}");
        }
        if !report.isolated_pores.is_empty() {
            log::warn!(
                "Isolated pores detected: count={} first={:?}",
                report.isolated_pores.len(),
                report.isolated_pores.first()
            );
        }
    }
    report
}
