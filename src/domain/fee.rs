use super::money::Amount;
use super::registration::{ParticipationType, UserType};
use serde::{Deserialize, Serialize};

/// A college matches a rule when its lower-cased name contains every
/// fragment in `all_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollegeRule {
    pub all_of: Vec<String>,
}

impl CollegeRule {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_of: fragments.into_iter().map(|s| s.into().to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, college_lower: &str) -> bool {
        !self.all_of.is_empty()
            && self
                .all_of
                .iter()
                .all(|fragment| college_lower.contains(fragment.as_str()))
    }
}

/// Registration fees by attendee type and participation category.
///
/// Colleges matching one of `discounted_colleges` pay the flat
/// `discounted` fee regardless of type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub visitor: Amount,
    pub sports: Amount,
    pub cultural: Amount,
    pub both: Amount,
    /// Participants who have not picked a category yet.
    pub unspecified: Amount,
    pub discounted: Amount,
    pub discounted_colleges: Vec<CollegeRule>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            visitor: Amount::rupees(200),
            sports: Amount::rupees(200),
            cultural: Amount::rupees(200),
            both: Amount::rupees(200),
            unspecified: Amount::rupees(200),
            discounted: Amount::rupees(150),
            discounted_colleges: vec![
                CollegeRule::new(["vignan pharmacy"]),
                CollegeRule::new(["vadlamudi"]),
                CollegeRule::new(["vfstr"]),
                CollegeRule::new(["vignan", "foundation", "science"]),
                CollegeRule::new(["lara", "vignan"]),
                CollegeRule::new(["lara institute"]),
            ],
        }
    }
}

impl FeeSchedule {
    pub fn is_discounted(&self, college: &str) -> bool {
        let college = college.trim().to_lowercase();
        if college.is_empty() {
            return false;
        }
        self.discounted_colleges
            .iter()
            .any(|rule| rule.matches(&college))
    }

    pub fn fee_for(
        &self,
        user_type: UserType,
        participation: ParticipationType,
        college: &str,
    ) -> Amount {
        if self.is_discounted(college) {
            return self.discounted;
        }
        match user_type {
            UserType::Visitor => self.visitor,
            UserType::Participant => match participation {
                ParticipationType::Sports => self.sports,
                ParticipationType::Cultural => self.cultural,
                ParticipationType::Both => self.both,
                ParticipationType::None => self.unspecified,
            },
        }
    }
}
