//! Operation plans: who to add, who to remove, and how to report each login.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::strategy::Strategy;
use crate::effects::GitHubEffect;
use crate::types::IssueNumber;

/// The reported outcome for one assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssigneeStatus {
    Kept,
    Added,
    Removed,
}

impl AssigneeStatus {
    /// The one-character marker used in the report.
    pub fn symbol(&self) -> char {
        match self {
            AssigneeStatus::Kept => '=',
            AssigneeStatus::Added => '+',
            AssigneeStatus::Removed => '-',
        }
    }
}

/// The changes needed to bring one issue's assignees to the target state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationPlan {
    pub to_add: BTreeSet<String>,
    pub to_remove: BTreeSet<String>,
    /// Exactly one status per login that appears in the report.
    pub statuses: BTreeMap<String, AssigneeStatus>,
}

/// Computes the plan for `matched` logins against the `current` assignees.
///
/// With `new = matched - current`, `common = matched & current` and
/// `stale = current - matched`:
///
/// - `append` adds `new`; everyone in `current` is kept.
/// - `set` adds all of `matched` (reported as added even when already
///   assigned); `stale` is kept.
/// - `change` adds `new` and removes `stale`; `common` is kept.
pub fn reconcile(
    matched: &BTreeSet<String>,
    current: &BTreeSet<String>,
    strategy: Strategy,
) -> OperationPlan {
    let new: BTreeSet<String> = matched.difference(current).cloned().collect();
    let mut plan = OperationPlan::default();

    match strategy {
        Strategy::Append => {
            mark(&mut plan.statuses, current, AssigneeStatus::Kept);
            mark(&mut plan.statuses, &new, AssigneeStatus::Added);
            plan.to_add = new;
        }
        Strategy::Set => {
            let stale: BTreeSet<String> = current.difference(matched).cloned().collect();
            mark(&mut plan.statuses, &stale, AssigneeStatus::Kept);
            mark(&mut plan.statuses, matched, AssigneeStatus::Added);
            plan.to_add = matched.clone();
        }
        Strategy::Change => {
            let common: BTreeSet<String> = matched.intersection(current).cloned().collect();
            let stale: BTreeSet<String> = current.difference(matched).cloned().collect();
            mark(&mut plan.statuses, &common, AssigneeStatus::Kept);
            mark(&mut plan.statuses, &stale, AssigneeStatus::Removed);
            mark(&mut plan.statuses, &new, AssigneeStatus::Added);
            plan.to_add = new;
            plan.to_remove = stale;
        }
    }

    plan
}

fn mark(
    statuses: &mut BTreeMap<String, AssigneeStatus>,
    logins: &BTreeSet<String>,
    status: AssigneeStatus,
) {
    for login in logins {
        statuses.insert(login.clone(), status);
    }
}

impl OperationPlan {
    /// The API calls that carry out this plan: a removal first, then an
    /// addition, each only when non-empty.
    pub fn effects(&self, issue: IssueNumber) -> Vec<GitHubEffect> {
        let mut effects = Vec::new();
        if !self.to_remove.is_empty() {
            effects.push(GitHubEffect::RemoveAssignees {
                issue,
                assignees: self.to_remove.iter().cloned().collect(),
            });
        }
        if !self.to_add.is_empty() {
            effects.push(GitHubEffect::AddAssignees {
                issue,
                assignees: self.to_add.iter().cloned().collect(),
            });
        }
        effects
    }

    /// The assignee set after the plan is applied to `current`, assuming
    /// GitHub accepts every login.
    pub fn resulting_assignees(&self, current: &BTreeSet<String>) -> BTreeSet<String> {
        current
            .difference(&self.to_remove)
            .chain(self.to_add.iter())
            .cloned()
            .collect()
    }

    /// Logins reported with `status`.
    pub fn with_status(&self, status: AssigneeStatus) -> BTreeSet<&str> {
        self.statuses
            .iter()
            .filter(|&(_, s)| *s == status)
            .map(|(login, _)| login.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Strategy;
    use crate::test_utils::arb_logins;
    use proptest::prelude::*;

    fn set(logins: &[&str]) -> BTreeSet<String> {
        logins.iter().map(|s| s.to_string()).collect()
    }

    fn logins<'a>(plan: &'a OperationPlan, status: AssigneeStatus) -> Vec<&'a str> {
        plan.with_status(status).into_iter().collect()
    }

    #[test]
    fn append_adds_new_and_keeps_current() {
        let plan = reconcile(&set(&["alice", "bob"]), &set(&["bob", "carol"]), Strategy::Append);
        assert_eq!(plan.to_add, set(&["alice"]));
        assert!(plan.to_remove.is_empty());
        assert_eq!(logins(&plan, AssigneeStatus::Added), ["alice"]);
        assert_eq!(logins(&plan, AssigneeStatus::Kept), ["bob", "carol"]);
    }

    #[test]
    fn append_with_nothing_new_issues_no_calls() {
        let plan = reconcile(&set(&["alice"]), &set(&["alice"]), Strategy::Append);
        assert!(plan.effects(IssueNumber(1)).is_empty());
        assert_eq!(logins(&plan, AssigneeStatus::Kept), ["alice"]);
    }

    #[test]
    fn set_reassigns_every_match() {
        let plan = reconcile(&set(&["alice", "bob"]), &set(&["bob", "carol"]), Strategy::Set);
        assert_eq!(plan.to_add, set(&["alice", "bob"]));
        assert!(plan.to_remove.is_empty());
        assert_eq!(logins(&plan, AssigneeStatus::Added), ["alice", "bob"]);
        assert_eq!(logins(&plan, AssigneeStatus::Kept), ["carol"]);
    }

    #[test]
    fn change_adds_new_and_removes_stale() {
        let plan = reconcile(&set(&["alice", "bob"]), &set(&["bob", "carol"]), Strategy::Change);
        assert_eq!(plan.to_add, set(&["alice"]));
        assert_eq!(plan.to_remove, set(&["carol"]));
        assert_eq!(logins(&plan, AssigneeStatus::Added), ["alice"]);
        assert_eq!(logins(&plan, AssigneeStatus::Kept), ["bob"]);
        assert_eq!(logins(&plan, AssigneeStatus::Removed), ["carol"]);
    }

    #[test]
    fn change_with_no_match_removes_everyone() {
        let plan = reconcile(&set(&[]), &set(&["carol"]), Strategy::Change);
        assert_eq!(plan.to_remove, set(&["carol"]));
        assert!(plan.to_add.is_empty());
    }

    #[test]
    fn removal_is_emitted_before_addition() {
        let plan = reconcile(&set(&["alice"]), &set(&["carol"]), Strategy::Change);
        let issue = IssueNumber(9);
        assert_eq!(
            plan.effects(issue),
            vec![
                GitHubEffect::RemoveAssignees {
                    issue,
                    assignees: vec!["carol".into()]
                },
                GitHubEffect::AddAssignees {
                    issue,
                    assignees: vec!["alice".into()]
                },
            ]
        );
    }

    #[test]
    fn symbols() {
        assert_eq!(AssigneeStatus::Added.symbol(), '+');
        assert_eq!(AssigneeStatus::Kept.symbol(), '=');
        assert_eq!(AssigneeStatus::Removed.symbol(), '-');
    }

    proptest! {
        #[test]
        fn change_plan_partitions_logins(matched in arb_logins(), current in arb_logins()) {
            let plan = reconcile(&matched, &current, Strategy::Change);
            prop_assert!(plan.to_add.is_disjoint(&plan.to_remove));

            let kept: BTreeSet<String> =
                plan.with_status(AssigneeStatus::Kept).into_iter().map(String::from).collect();
            let kept_matched: BTreeSet<String> = kept.intersection(&matched).cloned().collect();
            let covered: BTreeSet<String> = plan.to_add.union(&kept_matched).cloned().collect();
            prop_assert_eq!(covered, matched.clone());

            let stale: BTreeSet<String> = current.difference(&matched).cloned().collect();
            prop_assert_eq!(&plan.to_remove, &stale);
        }

        #[test]
        fn change_reaches_fixed_point(matched in arb_logins(), current in arb_logins()) {
            let first = reconcile(&matched, &current, Strategy::Change);
            let result = first.resulting_assignees(&current);
            prop_assert_eq!(&result, &matched);

            let second = reconcile(&matched, &result, Strategy::Change);
            prop_assert!(second.to_add.is_empty());
            prop_assert!(second.to_remove.is_empty());
        }

        #[test]
        fn append_never_removes(matched in arb_logins(), current in arb_logins()) {
            let plan = reconcile(&matched, &current, Strategy::Append);
            prop_assert!(plan.to_remove.is_empty());
            prop_assert!(current.is_subset(&plan.resulting_assignees(&current)));
        }

        #[test]
        fn set_never_removes(matched in arb_logins(), current in arb_logins()) {
            let plan = reconcile(&matched, &current, Strategy::Set);
            prop_assert!(plan.to_remove.is_empty());
            prop_assert_eq!(&plan.to_add, &matched);
        }

        #[test]
        fn every_reported_login_has_one_status(
            matched in arb_logins(),
            current in arb_logins(),
            strategy in prop_oneof![
                Just(Strategy::Append),
                Just(Strategy::Set),
                Just(Strategy::Change),
            ],
        ) {
            let plan = reconcile(&matched, &current, strategy);
            let everyone: BTreeSet<String> = matched.union(&current).cloned().collect();
            let reported: BTreeSet<String> = plan.statuses.keys().cloned().collect();
            prop_assert_eq!(reported, everyone);
        }
    }
}
