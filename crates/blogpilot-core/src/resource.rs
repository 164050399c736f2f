use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Server resource kinds. Each one owns a disjoint cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Auth,
    Templates,
    Blogs,
    Profile,
    Dashboard,
    Faqs,
    Notices,
    Inquiries,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Auth,
        Resource::Templates,
        Resource::Blogs,
        Resource::Profile,
        Resource::Dashboard,
        Resource::Faqs,
        Resource::Notices,
        Resource::Inquiries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Auth => "auth",
            Resource::Templates => "templates",
            Resource::Blogs => "blogs",
            Resource::Profile => "profile",
            Resource::Dashboard => "dashboard",
            Resource::Faqs => "faqs",
            Resource::Notices => "notices",
            Resource::Inquiries => "inquiries",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::UnknownResource(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for resource in Resource::ALL {
            assert_eq!(resource.as_str().parse::<Resource>().unwrap(), resource);
        }
        assert!("posts".parse::<Resource>().is_err());
    }
}
