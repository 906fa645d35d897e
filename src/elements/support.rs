//! External support conditions.

use serde::{Deserialize, Serialize};

use super::Dof;

/// Support condition at a node.
///
/// Each variant restrains a fixed set of global DOFs. An elastic spring
/// counts every direction with positive stiffness as restrained for the
/// indeterminacy computation; its finite flexibility enters the
/// compatibility equations instead of a rigid constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Support {
    /// Restrains Ux, Uy and Rz (3 reactions).
    Fixed,
    /// Restrains Ux and Uy (2 reactions).
    Pinned,
    /// Restrains a single translation (1 reaction).
    Roller { direction: Dof },
    /// Restrains the translation perpendicular to the free direction and
    /// the rotation (2 reactions).
    Guide { free_direction: Dof },
    /// Elastic restraint with finite stiffness per direction.
    ///
    /// Stiffnesses are non-negative and at least one must be positive;
    /// `kx`, `ky` in kN/m, `kt` in kNm/rad.
    Spring { kx: f64, ky: f64, kt: f64 },
}

impl Support {
    /// Fully fixed support.
    pub fn fixed() -> Self {
        Support::Fixed
    }

    /// Pinned support (translations restrained, rotation free).
    pub fn pinned() -> Self {
        Support::Pinned
    }

    /// Roller restraining the vertical translation.
    pub fn roller_y() -> Self {
        Support::Roller { direction: Dof::Uy }
    }

    /// Roller restraining the horizontal translation.
    pub fn roller_x() -> Self {
        Support::Roller { direction: Dof::Ux }
    }

    /// Guide free to slide along `free_direction`.
    pub fn guide(free_direction: Dof) -> Self {
        Support::Guide { free_direction }
    }

    /// Elastic spring support.
    pub fn spring(kx: f64, ky: f64, kt: f64) -> Self {
        Support::Spring { kx, ky, kt }
    }

    /// List of restrained DOFs.
    pub fn restrained_dofs(&self) -> Vec<Dof> {
        match *self {
            Support::Fixed => vec![Dof::Ux, Dof::Uy, Dof::Rz],
            Support::Pinned => vec![Dof::Ux, Dof::Uy],
            Support::Roller { direction } => vec![direction],
            Support::Guide { free_direction } => match free_direction {
                Dof::Ux => vec![Dof::Uy, Dof::Rz],
                Dof::Uy => vec![Dof::Ux, Dof::Rz],
                // A guide free to rotate is not meaningful; treat as pinned.
                Dof::Rz => vec![Dof::Ux, Dof::Uy],
            },
            Support::Spring { kx, ky, kt } => {
                let mut dofs = Vec::new();
                if kx > 0.0 {
                    dofs.push(Dof::Ux);
                }
                if ky > 0.0 {
                    dofs.push(Dof::Uy);
                }
                if kt > 0.0 {
                    dofs.push(Dof::Rz);
                }
                dofs
            }
        }
    }

    /// True if this support restrains the given DOF.
    pub fn restrains(&self, dof: Dof) -> bool {
        self.restrained_dofs().contains(&dof)
    }

    /// Number of restrained DOFs (reaction components).
    pub fn num_restrained(&self) -> usize {
        self.restrained_dofs().len()
    }

    /// True for the elastic spring variant.
    pub fn is_spring(&self) -> bool {
        matches!(self, Support::Spring { .. })
    }

    /// Spring stiffness in the direction of `dof`, when this support is a
    /// spring and that direction has positive stiffness.
    pub fn spring_stiffness(&self, dof: Dof) -> Option<f64> {
        match *self {
            Support::Spring { kx, ky, kt } => {
                let k = match dof {
                    Dof::Ux => kx,
                    Dof::Uy => ky,
                    Dof::Rz => kt,
                };
                (k > 0.0).then_some(k)
            }
            _ => None,
        }
    }

    /// Validate the variant invariants. Only springs carry parameters.
    pub fn validate(&self) -> Result<(), String> {
        if let Support::Spring { kx, ky, kt } = *self {
            if kx < 0.0 || ky < 0.0 || kt < 0.0 {
                return Err(format!(
                    "spring stiffness must be non-negative (kx={kx}, ky={ky}, kt={kt})"
                ));
            }
            if kx == 0.0 && ky == 0.0 && kt == 0.0 {
                return Err("spring must have at least one positive stiffness".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_support() {
        let support = Support::fixed();
        assert!(support.restrains(Dof::Ux));
        assert!(support.restrains(Dof::Uy));
        assert!(support.restrains(Dof::Rz));
        assert_eq!(support.num_restrained(), 3);
    }

    #[test]
    fn test_pinned_support() {
        let support = Support::pinned();
        assert!(support.restrains(Dof::Ux) && support.restrains(Dof::Uy));
        assert!(!support.restrains(Dof::Rz));
        assert_eq!(support.num_restrained(), 2);
    }

    #[test]
    fn test_guide_support() {
        let guide = Support::guide(Dof::Ux);
        assert_eq!(guide.restrained_dofs(), vec![Dof::Uy, Dof::Rz]);
    }

    #[test]
    fn test_spring_counts_positive_directions() {
        let spring = Support::spring(0.0, 1000.0, 0.0);
        assert_eq!(spring.restrained_dofs(), vec![Dof::Uy]);
        assert_eq!(spring.spring_stiffness(Dof::Uy), Some(1000.0));
        assert_eq!(spring.spring_stiffness(Dof::Ux), None);
    }

    #[test]
    fn test_spring_validation() {
        assert!(Support::spring(0.0, 0.0, 0.0).validate().is_err());
        assert!(Support::spring(-1.0, 0.0, 0.0).validate().is_err());
        assert!(Support::spring(0.0, 500.0, 0.0).validate().is_ok());
    }
}
