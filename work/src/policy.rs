//! Resource policies: which stamped resources a verifier accepts.

/// Predicate over a stamp's resource field.
///
/// Implemented for any `Fn(&str) -> bool + Send + Sync`, so a closure is
/// the usual way to supply one.
pub trait ResourcePolicy: Send + Sync {
    fn accept(&self, resource: &str) -> bool;
}

impl<F> ResourcePolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accept(&self, resource: &str) -> bool {
        self(resource)
    }
}

/// Accepts exactly one resource string, compared byte for byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExactResource(pub String);

impl ExactResource {
    pub fn new(resource: impl Into<String>) -> Self {
        Self(resource.into())
    }
}

impl ResourcePolicy for ExactResource {
    fn accept(&self, resource: &str) -> bool {
        self.0 == resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_policies() {
        let domain = |resource: &str| resource.ends_with("@example.com");
        assert!(domain.accept("alice@example.com"));
        assert!(!domain.accept("alice@example.org"));
    }

    #[test]
    fn exact_resource_is_case_sensitive() {
        let policy = ExactResource::new("someone@gmail.com");
        assert!(policy.accept("someone@gmail.com"));
        assert!(!policy.accept("Someone@gmail.com"));
        assert!(!policy.accept("someone@gmail.com "));
    }

    #[test]
    fn boxed_policy() {
        let policy: Box<dyn ResourcePolicy> = Box::new(|_: &str| false);
        assert!(!policy.accept("anything"));
    }
}
