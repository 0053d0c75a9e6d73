use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Cpu,
    Gpu,
}

impl ResourceKind {
    pub const COUNT: usize = 2;
    pub const ALL: [ResourceKind; Self::COUNT] = [ResourceKind::Cpu, ResourceKind::Gpu];

    fn index(&self) -> usize {
        match self {
            ResourceKind::Cpu => 0,
            ResourceKind::Gpu => 1,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Cpu => write!(f, "CPU"),
            ResourceKind::Gpu => write!(f, "GPU"),
        }
    }
}

/// A fixed-length vector of resource quantities, one slot per [ResourceKind].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceVector([f64; ResourceKind::COUNT]);

impl ResourceVector {
    pub fn new(cpus: f64, gpus: f64) -> Self {
        let mut vector = Self::default();
        vector.set(ResourceKind::Cpu, cpus);
        vector.set(ResourceKind::Gpu, gpus);
        vector
    }

    pub fn get(&self, kind: ResourceKind) -> f64 {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: ResourceKind, quantity: f64) {
        self.0[kind.index()] = quantity;
    }

    pub fn add(&mut self, other: &ResourceVector) {
        for kind in ResourceKind::ALL {
            self.0[kind.index()] += other.get(kind);
        }
    }

    pub fn subtract(&mut self, other: &ResourceVector) {
        for kind in ResourceKind::ALL {
            self.0[kind.index()] -= other.get(kind);
        }
    }

    /// Whether every component of this vector fits within `capacity`.
    pub fn fits_within(&self, capacity: &ResourceVector) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|kind| self.get(*kind) <= capacity.get(*kind))
    }

    /// Whether any component is still positive.
    pub fn any_available(&self) -> bool {
        ResourceKind::ALL.iter().any(|kind| self.get(*kind) > 0.0)
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in ResourceKind::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}: {}", self.get(*kind))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        let capacity = ResourceVector::new(2.0, 1.0);
        assert!(ResourceVector::new(2.0, 0.0).fits_within(&capacity));
        assert!(ResourceVector::new(0.0, 1.0).fits_within(&capacity));
        assert!(!ResourceVector::new(3.0, 0.0).fits_within(&capacity));
        assert!(!ResourceVector::new(1.0, 2.0).fits_within(&capacity));
    }

    #[test]
    fn test_any_available() {
        assert!(!ResourceVector::new(0.0, 0.0).any_available());
        assert!(ResourceVector::new(0.5, 0.0).any_available());
        assert!(ResourceVector::new(0.0, 1.0).any_available());
    }

    #[test]
    fn test_debit_and_credit() {
        let mut vector = ResourceVector::new(4.0, 1.0);
        let required = ResourceVector::new(1.0, 1.0);
        vector.subtract(&required);
        assert_eq!(vector, ResourceVector::new(3.0, 0.0));
        vector.add(&required);
        assert_eq!(vector, ResourceVector::new(4.0, 1.0));
    }
}
