//! Queue-family discovery
//!
//! Assigns the graphics, present, transfer and compute roles to the queue
//! families of a physical device. Families are scanned once, index 0 upward,
//! and every role is first-match:
//!
//! 1. the first GRAPHICS family becomes `graphics`;
//! 2. if that same family can present to the surface, it also becomes
//!    `present` before any other family is considered;
//! 3. once `graphics` is known, the first other family that can transfer
//!    becomes a dedicated `transfer` family;
//! 4. otherwise the first family that can present becomes `present`;
//! 5. the first COMPUTE family becomes `compute`.
//!
//! Without a dedicated transfer family, `transfer` shares the graphics family.

use ash::vk;
use std::collections::BTreeSet;
use std::fmt;

use super::instance::{VulkanError, VulkanResult};

/// The four queue roles a render device exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueRole {
    /// Graphics command submission
    Graphics,
    /// Presentation to the window surface
    Present,
    /// Transfer (copy) operations
    Transfer,
    /// Compute dispatch
    Compute,
}

impl fmt::Display for QueueRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Graphics => "graphics",
            Self::Present => "present",
            Self::Transfer => "transfer",
            Self::Compute => "compute",
        };
        f.write_str(name)
    }
}

/// Per-role family indices as found by the scan; `None` means unassigned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyAssignment {
    /// Graphics family
    pub graphics: Option<u32>,
    /// Present family
    pub present: Option<u32>,
    /// Transfer family
    pub transfer: Option<u32>,
    /// Compute family
    pub compute: Option<u32>,
}

/// Fully resolved queue families, one per role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    /// Graphics family
    pub graphics: u32,
    /// Present family
    pub present: u32,
    /// Transfer family
    pub transfer: u32,
    /// Compute family
    pub compute: u32,
}

/// Outcome of resolving an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueDiscovery {
    /// Every role has a family
    Found(QueueFamilies),
    /// The first role (in graphics, present, compute order) left unassigned
    MissingRole(QueueRole),
}

impl QueueFamilyAssignment {
    fn is_complete(&self) -> bool {
        self.graphics.is_some()
            && self.present.is_some()
            && self.transfer.is_some()
            && self.compute.is_some()
    }

    /// Check that graphics, present and compute were found
    pub fn resolve(self) -> QueueDiscovery {
        let (Some(graphics), Some(present), Some(compute)) =
            (self.graphics, self.present, self.compute)
        else {
            let missing = if self.graphics.is_none() {
                QueueRole::Graphics
            } else if self.present.is_none() {
                QueueRole::Present
            } else {
                QueueRole::Compute
            };
            return QueueDiscovery::MissingRole(missing);
        };

        QueueDiscovery::Found(QueueFamilies {
            graphics,
            present,
            transfer: self.transfer.unwrap_or(graphics),
            compute,
        })
    }
}

impl QueueDiscovery {
    /// Turn a missing role into an error
    pub fn into_result(self) -> VulkanResult<QueueFamilies> {
        match self {
            Self::Found(families) => Ok(families),
            Self::MissingRole(role) => Err(VulkanError::MissingQueueFamily(role)),
        }
    }
}

impl QueueFamilies {
    /// Family index serving `role`
    pub fn family(&self, role: QueueRole) -> u32 {
        match role {
            QueueRole::Graphics => self.graphics,
            QueueRole::Present => self.present,
            QueueRole::Transfer => self.transfer,
            QueueRole::Compute => self.compute,
        }
    }

    /// Distinct family indices, ascending; one queue is requested from each
    pub fn unique(&self) -> BTreeSet<u32> {
        [self.graphics, self.present, self.transfer, self.compute]
            .into_iter()
            .collect()
    }
}

/// Graphics and compute families always accept transfer work, reported or not
fn supports_transfer(flags: vk::QueueFlags) -> bool {
    flags.intersects(vk::QueueFlags::TRANSFER | vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE)
}

/// Scan `families` and assign queue roles
///
/// `supports_present` answers whether the family at the given index can present
/// to the target surface; its errors abort the scan. Each family is queried at
/// most once. The transfer fallback to the graphics family is already applied
/// to the returned assignment.
pub fn discover_queue_families<F>(
    families: &[vk::QueueFamilyProperties],
    mut supports_present: F,
) -> VulkanResult<QueueFamilyAssignment>
where
    F: FnMut(u32) -> VulkanResult<bool>,
{
    let mut assignment = QueueFamilyAssignment::default();

    for (index, family) in (0u32..).zip(families) {
        let flags = family.queue_flags;
        let mut present_support = None;

        if assignment.graphics.is_none() && flags.contains(vk::QueueFlags::GRAPHICS) {
            assignment.graphics = Some(index);

            let can_present = supports_present(index)?;
            present_support = Some(can_present);
            if can_present && assignment.present.is_none() {
                assignment.present = Some(index);
            }
        }

        if assignment.transfer.is_none() && supports_transfer(flags) {
            if let Some(graphics) = assignment.graphics {
                if graphics != index {
                    assignment.transfer = Some(index);
                }
            }
        }

        if assignment.present.is_none() {
            let can_present = match present_support {
                Some(known) => known,
                None => supports_present(index)?,
            };
            if can_present {
                assignment.present = Some(index);
            }
        }

        if assignment.compute.is_none() && flags.contains(vk::QueueFlags::COMPUTE) {
            assignment.compute = Some(index);
        }

        log::debug!("Queue family {}: {:?} -> {:?}", index, flags, assignment);

        if assignment.is_complete() {
            break;
        }
    }

    if assignment.transfer.is_none() {
        assignment.transfer = assignment.graphics;
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(queue_flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags,
            queue_count: 1,
            ..Default::default()
        }
    }

    fn present_on(indices: &'static [u32]) -> impl FnMut(u32) -> VulkanResult<bool> {
        move |index| Ok(indices.contains(&index))
    }

    // GRAPHICS | COMPUTE | TRANSFER
    const ALL: vk::QueueFlags = vk::QueueFlags::from_raw(0b111);

    #[test]
    fn test_single_universal_family_takes_every_role() {
        let families = [family(ALL)];
        let assignment = discover_queue_families(&families, present_on(&[0])).unwrap();
        let resolved = assignment.resolve().into_result().unwrap();

        assert_eq!(resolved, QueueFamilies { graphics: 0, present: 0, transfer: 0, compute: 0 });
        assert_eq!(resolved.unique().len(), 1);
    }

    #[test]
    fn test_dedicated_transfer_family_is_preferred() {
        let families = [family(vk::QueueFlags::GRAPHICS), family(vk::QueueFlags::TRANSFER)];
        let assignment = discover_queue_families(&families, present_on(&[])).unwrap();

        assert_eq!(assignment.graphics, Some(0));
        assert_eq!(assignment.transfer, Some(1));
        assert_eq!(assignment.present, None);
        assert_eq!(assignment.resolve(), QueueDiscovery::MissingRole(QueueRole::Present));
    }

    #[test]
    fn test_transfer_falls_back_to_graphics() {
        let families = [family(ALL), family(vk::QueueFlags::SPARSE_BINDING)];
        let assignment = discover_queue_families(&families, present_on(&[0])).unwrap();

        assert_eq!(assignment.transfer, assignment.graphics);
        assert_eq!(assignment.transfer, Some(0));
    }

    #[test]
    fn test_present_prefers_graphics_family() {
        let families = [family(ALL), family(ALL), family(vk::QueueFlags::TRANSFER)];
        let mut queried = Vec::new();
        let assignment = discover_queue_families(&families, |index| {
            queried.push(index);
            Ok(true)
        })
        .unwrap();

        assert_eq!(assignment.present, Some(0));
        assert_eq!(queried.first(), Some(&0));
    }

    #[test]
    fn test_present_first_match_fallback() {
        // Family 0 cannot present; family 1 is the first that can.
        let families = [
            family(ALL),
            family(vk::QueueFlags::TRANSFER),
            family(vk::QueueFlags::TRANSFER),
        ];
        let assignment = discover_queue_families(&families, present_on(&[1, 2])).unwrap();

        assert_eq!(assignment.graphics, Some(0));
        assert_eq!(assignment.present, Some(1));
        assert_eq!(assignment.transfer, Some(1));
    }

    #[test]
    fn test_present_locked_before_later_graphics_present_family() {
        // First-match: family 0 (compute + present) wins present even though
        // family 1 could host graphics and present together.
        let families = [family(vk::QueueFlags::COMPUTE), family(ALL)];
        let assignment = discover_queue_families(&families, present_on(&[0, 1])).unwrap();

        assert_eq!(assignment.present, Some(0));
        assert_eq!(assignment.graphics, Some(1));
        assert_eq!(assignment.compute, Some(0));
    }

    #[test]
    fn test_transfer_requires_graphics_first() {
        // A transfer-only family before the graphics family is not picked as dedicated transfer.
        let families = [family(vk::QueueFlags::TRANSFER), family(ALL)];
        let assignment = discover_queue_families(&families, present_on(&[1])).unwrap();

        assert_eq!(assignment.graphics, Some(1));
        assert_eq!(assignment.transfer, Some(1));
    }

    #[test]
    fn test_compute_is_first_match() {
        let families = [
            family(vk::QueueFlags::GRAPHICS),
            family(vk::QueueFlags::COMPUTE),
            family(vk::QueueFlags::COMPUTE),
        ];
        let assignment = discover_queue_families(&families, present_on(&[0])).unwrap();

        assert_eq!(assignment.compute, Some(1));
        assert_eq!(assignment.transfer, Some(1));
    }

    #[test]
    fn test_scan_stops_once_all_roles_assigned() {
        let families = [family(ALL), family(vk::QueueFlags::TRANSFER), family(ALL), family(ALL)];
        let mut queried = Vec::new();
        discover_queue_families(&families, |index| {
            queried.push(index);
            Ok(index == 0)
        })
        .unwrap();

        assert_eq!(queried, vec![0]);
    }

    #[test]
    fn test_missing_compute_is_reported() {
        let families = [family(vk::QueueFlags::GRAPHICS)];
        let assignment = discover_queue_families(&families, present_on(&[0])).unwrap();

        assert_eq!(assignment.resolve(), QueueDiscovery::MissingRole(QueueRole::Compute));
        assert!(matches!(
            assignment.resolve().into_result(),
            Err(VulkanError::MissingQueueFamily(QueueRole::Compute))
        ));
    }

    #[test]
    fn test_empty_family_list_misses_graphics() {
        let assignment = discover_queue_families(&[], present_on(&[])).unwrap();
        assert_eq!(assignment, QueueFamilyAssignment::default());
        assert_eq!(assignment.resolve(), QueueDiscovery::MissingRole(QueueRole::Graphics));
    }

    #[test]
    fn test_present_query_error_aborts_scan() {
        let families = [family(ALL)];
        let result = discover_queue_families(&families, |_| {
            Err(VulkanError::Api(vk::Result::ERROR_SURFACE_LOST_KHR))
        });
        assert!(matches!(result, Err(VulkanError::Api(vk::Result::ERROR_SURFACE_LOST_KHR))));
    }

    #[test]
    fn test_unique_families_are_deduplicated() {
        let families = QueueFamilies { graphics: 0, present: 2, transfer: 1, compute: 0 };
        let unique: Vec<u32> = families.unique().into_iter().collect();
        assert_eq!(unique, vec![0, 1, 2]);
        assert_eq!(families.family(QueueRole::Present), 2);
    }
}
