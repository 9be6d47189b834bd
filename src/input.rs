use serde::{Deserialize, Serialize};

use crate::{EditError, NodeId, Position, RoadKey};

/// Parses a decimal number typed into a form field.
///
/// Surrounding whitespace is ignored. Empty input, non-numeric input and NaN
/// are rejected.
pub fn parse_number(field: &'static str, value: &str) -> Result<f64, EditError> {
    match value.trim().parse::<f64>() {
        Ok(number) if !number.is_nan() => Ok(number),
        _ => Err(EditError::InvalidNumber {
            field,
            value: value.to_owned(),
        }),
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, EditError> {
    if value.is_empty() {
        Err(EditError::MissingField(field))
    } else {
        Ok(value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NodeForm {
    pub id: String,
    pub latitude: String,
    pub longitude: String,
}

impl NodeForm {
    pub fn parse(&self) -> Result<(NodeId, Position), EditError> {
        let id = required("intersection id", &self.id)?;
        let latitude = parse_number("latitude", &self.latitude)?;
        let longitude = parse_number("longitude", &self.longitude)?;

        Ok((id.to_owned(), Position::new(latitude, longitude)))
    }
}

#[derive(Clone, Debug, Default)]
pub struct RoadForm {
    pub from: String,
    pub to: String,
    pub weight: String,
}

impl RoadForm {
    pub fn parse(&self) -> Result<(NodeId, NodeId, f64), EditError> {
        let from = required("start of road", &self.from)?;
        let to = required("end of road", &self.to)?;
        let weight = parse_number("weight", &self.weight)?;

        if from == to {
            return Err(EditError::SelfLoop(from.to_owned()));
        }

        Ok((from.to_owned(), to.to_owned(), weight))
    }
}

#[derive(Clone, Debug, Default)]
pub struct WeightForm {
    pub road: Option<RoadKey>,
    pub weight: String,
}

impl WeightForm {
    pub fn parse(&self) -> Result<(RoadKey, f64), EditError> {
        let road = self.road.clone().ok_or(EditError::MissingField("road"))?;
        let weight = parse_number("weight", &self.weight)?;

        Ok((road, weight))
    }
}

/// Latitude and longitude form fields filled in from a click on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFields {
    pub latitude: String,
    pub longitude: String,
}

impl CoordinateFields {
    pub fn from_click(position: Position) -> Self {
        Self {
            latitude: format!("{:.5}", position.latitude),
            longitude: format!("{:.5}", position.longitude),
        }
    }

    pub fn into_node_form(self, id: impl Into<String>) -> NodeForm {
        NodeForm {
            id: id.into(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("weight", " 2.5 "), Ok(2.5));
        assert_eq!(parse_number("weight", "-75.6"), Ok(-75.6));
        assert!(parse_number("weight", "").is_err());
        assert!(parse_number("weight", "abc").is_err());
        assert!(parse_number("weight", "NaN").is_err());
    }

    #[test]
    fn test_node_form() {
        let form = NodeForm {
            id: "31".into(),
            latitude: "39.97".into(),
            longitude: "-75.6".into(),
        };
        assert_eq!(
            form.parse(),
            Ok(("31".to_string(), Position::new(39.97, -75.6)))
        );

        let missing_id = NodeForm {
            id: String::new(),
            ..form.clone()
        };
        assert_eq!(
            missing_id.parse(),
            Err(EditError::MissingField("intersection id"))
        );

        let bad_longitude = NodeForm {
            longitude: "west".into(),
            ..form
        };
        assert!(matches!(
            bad_longitude.parse(),
            Err(EditError::InvalidNumber {
                field: "longitude",
                ..
            })
        ));
    }

    #[test]
    fn test_road_form() {
        let form = RoadForm {
            from: "1".into(),
            to: "2".into(),
            weight: "4".into(),
        };
        assert_eq!(form.parse(), Ok(("1".to_string(), "2".to_string(), 4.0)));

        let unselected = RoadForm {
            to: String::new(),
            ..form.clone()
        };
        assert_eq!(unselected.parse(), Err(EditError::MissingField("end of road")));

        let self_loop = RoadForm {
            to: "1".into(),
            ..form
        };
        assert_eq!(self_loop.parse(), Err(EditError::SelfLoop("1".into())));
    }

    #[test]
    fn test_weight_form() {
        let form = WeightForm {
            road: None,
            weight: "3".into(),
        };
        assert_eq!(form.parse(), Err(EditError::MissingField("road")));

        let form = WeightForm {
            road: Some(RoadKey::new("2", "1")),
            weight: "3".into(),
        };
        assert_eq!(form.parse(), Ok((RoadKey::new("1", "2"), 3.0)));
    }

    #[test]
    fn test_click_fills_coordinates() {
        let fields = CoordinateFields::from_click(Position::new(39.972241234, -75.6));
        assert_eq!(fields.latitude, "39.97224");
        assert_eq!(fields.longitude, "-75.60000");

        let form = fields.into_node_form("31");
        assert_eq!(form.parse().unwrap().1, Position::new(39.97224, -75.6));
    }
}
