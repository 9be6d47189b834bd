use crate::{Node, Position};

const INTERSECTIONS: [(&str, f64, f64); 30] = [
    ("1", 39.97224, -75.60075),
    ("2", 39.97026, -75.59960),
    ("3", 39.96464, -75.60844),
    ("4", 39.97861, -75.59269),
    ("5", 39.96356, -75.60119),
    ("6", 39.97159, -75.59662),
    ("7", 39.96667, -75.59702),
    ("8", 39.97036, -75.59569),
    ("9", 39.96808, -75.59396),
    ("10", 39.96758, -75.59770),
    ("11", 39.96898, -75.59874),
    ("12", 39.96666, -75.60010),
    ("13", 39.97504, -75.59886),
    ("14", 39.97429, -75.60248),
    ("15", 39.96846, -75.60010),
    ("16", 39.96772, -75.60025),
    ("17", 39.96657, -75.60403),
    ("18", 39.96534, -75.60303),
    ("19", 39.97200, -75.60834),
    ("20", 39.96907, -75.60229),
    ("21", 39.96573, -75.59632),
    ("22", 39.96926, -75.60625),
    ("23", 39.96334, -75.60745),
    ("24", 39.96470, -75.59861),
    ("25", 39.97560, -75.59071),
    ("26", 39.96743, -75.61044),
    ("27", 39.96356, -75.60119),
    ("28", 39.97735, -75.58660),
    ("29", 39.97073, -75.59597),
    ("30", 39.97341, -75.58999),
];

/// The intersections a fresh network starts with. It has no roads.
pub fn default_nodes() -> Vec<Node> {
    INTERSECTIONS
        .iter()
        .map(|&(id, latitude, longitude)| Node::new(id, Position::new(latitude, longitude)))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_default_nodes() {
        let nodes = default_nodes();

        assert_eq!(nodes.len(), 30);
        assert_eq!(nodes[0].id, "1");
        assert_eq!(nodes[0].name, "Intersection 1");
        assert_eq!(nodes[29].position, Position::new(39.97341, -75.58999));

        let mut ids: Vec<_> = nodes.iter().map(|node| node.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }
}
