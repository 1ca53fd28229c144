//! Flow paths ("hoses") between vessels.
//!
//! A path is either registered or absent. Paths are kept in registration
//! order, which is also the order the transfer engine evaluates them in.

use std::fmt;
use std::str::FromStr;

use fnv::FnvHashMap;
use thiserror::Error;

use crate::vessel::Vessel;

/// Where a path draws water from in its source vessel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupMode {
    Normal,
    /// Submerged intake; drains at a boosted rate.
    BottomPickup,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown pickup mode `{0}` (expected normal or bottom)")]
pub struct ParsePickupError(pub String);

impl FromStr for PickupMode {
    type Err = ParsePickupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "side" | "top" => Ok(PickupMode::Normal),
            "bottom" | "bottompickup" | "bottom-pickup" => Ok(PickupMode::BottomPickup),
            _ => Err(ParsePickupError(s.to_string())),
        }
    }
}

/// Role of a registered path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Canonical `Basin -> Reservoir` water path.
    Drain,
    /// Canonical `Reservoir <-> Top` air coupling; never carries water.
    AirLine,
    /// Canonical `Basin (bottom pickup) -> Top (nozzle)` jet feed.
    Riser,
    /// Any other hose the user plugged in.
    User,
}

impl PathKind {
    pub const CANONICAL: [PathKind; 3] = [PathKind::Drain, PathKind::AirLine, PathKind::Riser];

    pub fn is_canonical(self) -> bool {
        !matches!(self, PathKind::User)
    }

    /// Endpoints a canonical path is seeded with.
    pub fn canonical_endpoints(self) -> Option<(Vessel, Vessel, PickupMode)> {
        match self {
            PathKind::Drain => Some((Vessel::Basin, Vessel::Reservoir, PickupMode::Normal)),
            PathKind::AirLine => Some((Vessel::Reservoir, Vessel::Top, PickupMode::Normal)),
            PathKind::Riser => Some((Vessel::Basin, Vessel::Top, PickupMode::BottomPickup)),
            PathKind::User => None,
        }
    }

    /// Recognise canonical hoses by their endpoints.
    pub fn classify(from: Vessel, to: Vessel, pickup: PickupMode) -> PathKind {
        match (from, to, pickup) {
            (Vessel::Basin, Vessel::Reservoir, PickupMode::Normal) => PathKind::Drain,
            (Vessel::Reservoir, Vessel::Top, _) | (Vessel::Top, Vessel::Reservoir, _) => {
                PathKind::AirLine
            }
            (Vessel::Basin, Vessel::Top, PickupMode::BottomPickup) => PathKind::Riser,
            _ => PathKind::User,
        }
    }
}

/// Opaque identifier returned by `connect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathHandle(u32);

impl PathHandle {
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PathHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowPath {
    pub handle: PathHandle,
    pub kind: PathKind,
    pub from: Vessel,
    pub to: Vessel,
    pub pickup: PickupMode,
}

// Canonical kinds are unique regardless of direction; user paths are keyed
// by their full endpoint triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum PathKey {
    Canonical(PathKind),
    User(Vessel, Vessel, PickupMode),
}

impl PathKey {
    fn of(kind: PathKind, from: Vessel, to: Vessel, pickup: PickupMode) -> Self {
        if kind.is_canonical() {
            PathKey::Canonical(kind)
        } else {
            PathKey::User(from, to, pickup)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FlowTopology {
    paths: Vec<FlowPath>,
    index: FnvHashMap<PathKey, PathHandle>,
    next_handle: u32,
}

impl FlowTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topology with the three canonical paths registered.
    pub fn canonical() -> Self {
        let mut topology = Self::new();
        topology.seed_canonical();
        topology
    }

    /// Register any canonical path that is currently missing.
    pub fn seed_canonical(&mut self) {
        for kind in PathKind::CANONICAL {
            if let Some((from, to, pickup)) = kind.canonical_endpoints() {
                self.connect(from, to, pickup);
            }
        }
    }

    /// Register a path. Self-loops are ignored (`None`); connecting an
    /// already-present path returns the existing handle.
    pub fn connect(&mut self, from: Vessel, to: Vessel, pickup: PickupMode) -> Option<PathHandle> {
        if from == to {
            log::debug!("[topology] ignoring self-connection on {from}");
            return None;
        }
        let kind = PathKind::classify(from, to, pickup);
        let key = PathKey::of(kind, from, to, pickup);
        if let Some(existing) = self.index.get(&key) {
            return Some(*existing);
        }
        let handle = PathHandle(self.next_handle);
        self.next_handle += 1;
        self.paths.push(FlowPath {
            handle,
            kind,
            from,
            to,
            pickup,
        });
        self.index.insert(key, handle);
        log::debug!("[topology] connected {handle} {kind:?} {from}->{to} ({pickup:?})");
        Some(handle)
    }

    pub fn disconnect(&mut self, handle: PathHandle) -> bool {
        let Some(pos) = self.paths.iter().position(|p| p.handle == handle) else {
            return false;
        };
        let path = self.paths.remove(pos);
        self.index
            .remove(&PathKey::of(path.kind, path.from, path.to, path.pickup));
        log::debug!("[topology] disconnected {handle} {:?}", path.kind);
        true
    }

    /// Remove every path touching `vessel`, canonical ones included.
    pub fn disconnect_paths_for(&mut self, vessel: Vessel) -> usize {
        self.remove_where(|p| p.from == vessel || p.to == vessel)
    }

    /// Drop all user paths, keeping whichever canonical paths exist.
    pub fn clear_user_paths(&mut self) -> usize {
        self.remove_where(|p| !p.kind.is_canonical())
    }

    fn remove_where(&mut self, mut pred: impl FnMut(&FlowPath) -> bool) -> usize {
        let before = self.paths.len();
        let index = &mut self.index;
        self.paths.retain(|p| {
            if pred(p) {
                index.remove(&PathKey::of(p.kind, p.from, p.to, p.pickup));
                false
            } else {
                true
            }
        });
        before - self.paths.len()
    }

    pub fn is_connected(&self, kind: PathKind) -> bool {
        self.paths.iter().any(|p| p.kind == kind)
    }

    /// Both halves of the fountain plumbing are in place.
    pub fn jet_plumbed(&self) -> bool {
        self.is_connected(PathKind::Riser) && self.is_connected(PathKind::AirLine)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowPath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
