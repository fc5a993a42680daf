//! Team hierarchy assembly.
//!
//! Turns the flat `teams` rows plus a per-team employee listing into an
//! ordered forest of [`TeamNode`]s. The tree is a derived view and is rebuilt
//! for every request.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Employee, Team};

/// A team together with its employees and nested child teams.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamNode {
    pub id: Uuid,
    pub name: String,
    pub parent_team_id: Option<Uuid>,
    pub employees: Vec<Employee>,
    /// Child teams, in the order they were listed.
    #[schema(no_recursion)]
    pub children: Vec<TeamNode>,
}

impl TeamNode {
    fn new(team: Team, employees: Vec<Employee>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            parent_team_id: team.parent_team_id,
            employees,
            children: Vec::new(),
        }
    }
}

/// Build the team forest in a single indexed pass.
///
/// Roots and siblings keep the order of `teams`. A team whose parent is not
/// part of `teams` is dropped, as is every team that cannot be reached from a
/// root (self-parented teams and members of a parent cycle).
pub fn build_forest(
    teams: Vec<Team>,
    mut employees_by_team: HashMap<Uuid, Vec<Employee>>,
) -> Vec<TeamNode> {
    let index: HashMap<Uuid, usize> = teams
        .iter()
        .enumerate()
        .map(|(position, team)| (team.id, position))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); teams.len()];
    let mut roots = Vec::new();

    for (position, team) in teams.iter().enumerate() {
        match team.parent_team_id {
            None => roots.push(position),
            Some(parent_id) => match index.get(&parent_id) {
                Some(&parent) => children[parent].push(position),
                None => tracing::warn!(
                    team_id = %team.id,
                    parent_team_id = %parent_id,
                    "Dropping team with unknown parent from hierarchy"
                ),
            },
        }
    }

    let mut nodes: Vec<Option<TeamNode>> = teams
        .into_iter()
        .map(|team| {
            let employees = employees_by_team.remove(&team.id).unwrap_or_default();
            Some(TeamNode::new(team, employees))
        })
        .collect();

    roots
        .into_iter()
        .filter_map(|root| assemble(root, &mut nodes, &mut children))
        .collect()
}

/// Move node `position` out of `nodes` with its subtree attached.
///
/// Each node has one parent, so every reachable position is visited once and
/// `take` never yields `None` for a tree edge.
fn assemble(
    position: usize,
    nodes: &mut [Option<TeamNode>],
    children: &mut [Vec<usize>],
) -> Option<TeamNode> {
    let mut node = nodes[position].take()?;
    for child in std::mem::take(&mut children[position]) {
        if let Some(child_node) = assemble(child, nodes, children) {
            node.children.push(child_node);
        }
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewEmployee;

    fn team(name: &str, parent: Option<&Team>) -> Team {
        Team::new(name.to_string(), parent.map(|p| p.id))
    }

    fn employee(name: &str, team: &Team) -> Employee {
        Employee::new(NewEmployee {
            name: name.to_string(),
            surname: "Doe".to_string(),
            position: "Engineer".to_string(),
            team_id: team.id,
            start_date: None,
            end_date: None,
        })
    }

    #[test]
    fn test_empty_input_gives_empty_forest() {
        assert!(build_forest(Vec::new(), HashMap::new()).is_empty());
    }

    #[test]
    fn test_chain_with_employees() {
        let a = team("A", None);
        let b = team("B", Some(&a));
        let c = team("C", Some(&b));
        let e1 = employee("e1", &b);

        let employees = HashMap::from([(b.id, vec![e1.clone()])]);
        let forest = build_forest(vec![a.clone(), b.clone(), c.clone()], employees);

        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.id, a.id);
        assert!(root.employees.is_empty());
        assert_eq!(root.children.len(), 1);

        let middle = &root.children[0];
        assert_eq!(middle.id, b.id);
        assert_eq!(middle.parent_team_id, Some(a.id));
        assert_eq!(middle.employees, vec![e1]);
        assert_eq!(middle.children.len(), 1);

        let leaf = &middle.children[0];
        assert_eq!(leaf.id, c.id);
        assert!(leaf.employees.is_empty());
        assert!(leaf.children.is_empty());
    }

    #[test]
    fn test_child_listed_before_parent_is_still_attached() {
        let a = team("A", None);
        let b = team("B", Some(&a));

        let forest = build_forest(vec![b.clone(), a.clone()], HashMap::new());

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, a.id);
        assert_eq!(forest[0].children[0].id, b.id);
    }

    #[test]
    fn test_dangling_parent_is_dropped() {
        let a = team("A", None);
        let ghost = team("ghost", None);
        let orphan = team("orphan", Some(&ghost));
        let orphan_child = team("orphan child", Some(&orphan));

        let forest = build_forest(vec![a.clone(), orphan, orphan_child], HashMap::new());

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, a.id);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_roots_and_siblings_keep_input_order() {
        let r1 = team("r1", None);
        let r2 = team("r2", None);
        let s3 = team("s3", Some(&r1));
        let s1 = team("s1", Some(&r1));
        let s2 = team("s2", Some(&r1));

        let forest = build_forest(
            vec![r2.clone(), s3.clone(), r1.clone(), s1.clone(), s2.clone()],
            HashMap::new(),
        );

        let root_ids: Vec<Uuid> = forest.iter().map(|n| n.id).collect();
        assert_eq!(root_ids, vec![r2.id, r1.id]);

        let sibling_ids: Vec<Uuid> = forest[1].children.iter().map(|n| n.id).collect();
        assert_eq!(sibling_ids, vec![s3.id, s1.id, s2.id]);
    }

    #[test]
    fn test_self_parented_team_is_dropped() {
        let a = team("A", None);
        let mut selfish = team("selfish", None);
        selfish.parent_team_id = Some(selfish.id);

        let forest = build_forest(vec![a.clone(), selfish], HashMap::new());

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, a.id);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_parent_cycle_is_dropped() {
        let mut x = team("X", None);
        let y = team("Y", Some(&x));
        x.parent_team_id = Some(y.id);
        let root = team("root", None);

        let forest = build_forest(vec![x, y, root.clone()], HashMap::new());

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, root.id);
    }

    #[test]
    fn test_employees_for_unknown_team_are_ignored() {
        let a = team("A", None);
        let stray_team = team("stray", None);
        let employees = HashMap::from([(stray_team.id, vec![employee("e", &stray_team)])]);

        let forest = build_forest(vec![a], employees);

        assert_eq!(forest.len(), 1);
        assert!(forest[0].employees.is_empty());
    }
}
