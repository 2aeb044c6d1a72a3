/// Closed set of inline-keyboard actions. Callback payloads are the tagged
/// forms `areas`, `area:<id>` and `region:<id>`; anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CallbackAction {
    ShowAreas,
    ShowArea { area_id: String },
    ShowRegion { region_id: String },
}

impl CallbackAction {
    pub(super) fn parse(data: &str) -> Option<Self> {
        if data == "areas" {
            return Some(Self::ShowAreas);
        }
        if let Some(area_id) = data.strip_prefix("area:") {
            return Some(Self::ShowArea {
                area_id: area_id.to_string(),
            });
        }
        if let Some(region_id) = data.strip_prefix("region:") {
            return Some(Self::ShowRegion {
                region_id: region_id.to_string(),
            });
        }
        None
    }

    pub(super) fn encode(&self) -> String {
        match self {
            Self::ShowAreas => "areas".to_string(),
            Self::ShowArea { area_id } => format!("area:{}", area_id),
            Self::ShowRegion { region_id } => format!("region:{}", region_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CallbackAction;

    #[test]
    fn round_trips_every_variant() {
        let actions = [
            CallbackAction::ShowAreas,
            CallbackAction::ShowArea {
                area_id: "nordovest".to_string(),
            },
            CallbackAction::ShowRegion {
                region_id: "lombardia".to_string(),
            },
        ];

        for action in actions {
            let parsed = CallbackAction::parse(&action.encode()).expect("parse back");
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn unknown_payloads_are_ignored() {
        assert!(CallbackAction::parse("").is_none());
        assert!(CallbackAction::parse("cmd:graph:cpu").is_none());
        assert!(CallbackAction::parse("regions").is_none());
    }
}
