use persona_forge::persona::{
    assemble, compose, order_for_application, Overrides, PersonaConfig, PersonaEnhancement,
};
use proptest::prelude::*;
use serde_json::json;

fn persona_strategy() -> impl Strategy<Value = PersonaConfig> {
    (
        "[a-z]{1,8}",
        "[a-z ]{0,24}",
        prop::collection::vec("[a-z_]{1,8}", 0..5),
        prop::collection::vec("[a-z-]{1,8}", 0..3),
        0.0f64..=2.0,
    )
        .prop_map(|(name, description, tools, packs, temperature)| {
            let mut persona = PersonaConfig::new("p", name, "1.0", description);
            let mut unique = Vec::new();
            for tool in tools {
                if !unique.contains(&tool) {
                    unique.push(tool);
                }
            }
            persona.tools_access = unique;
            persona.default_packs = packs;
            persona.temperature = temperature;
            persona
        })
}

fn enhancement_strategy() -> impl Strategy<Value = PersonaEnhancement> {
    let model = "[a-z]{3,8}".prop_map(|m| ("model", json!({ "model": m })));
    let tools = (prop::collection::vec("[a-z]{1,6}", 0..4), any::<bool>())
        .prop_map(|(tools, append)| ("tool", json!({ "tools": tools, "append": append })));
    let weight = (0.0f64..1.0).prop_map(|w| ("weight", json!({ "weights": { "generate": w } })));
    let prompt = "[A-Za-z .]{1,20}".prop_map(|p| ("prompt", json!({ "prompt": p })));

    (prop_oneof![model, tools, weight, prompt], -5i64..5, "[a-z]{4}").prop_map(
        |((kind, value), priority, id)| {
            PersonaEnhancement::new(id.clone(), "p", kind, id, value, priority)
        },
    )
}

proptest! {
    #[test]
    fn empty_fold_returns_equal_persona(persona in persona_strategy()) {
        prop_assert_eq!(compose(&persona, &[], None), persona);
    }

    #[test]
    fn compose_leaves_base_untouched(
        persona in persona_strategy(),
        enhancements in prop::collection::vec(enhancement_strategy(), 0..6),
    ) {
        let snapshot = persona.clone();
        let _ = compose(&persona, &enhancements, None);
        prop_assert_eq!(persona, snapshot);
    }

    #[test]
    fn compose_and_assemble_are_deterministic(
        persona in persona_strategy(),
        enhancements in prop::collection::vec(enhancement_strategy(), 0..6),
    ) {
        let first = compose(&persona, &enhancements, None);
        let second = compose(&persona, &enhancements, None);
        prop_assert_eq!(assemble(&first), assemble(&second));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn appended_tools_keep_existing_order_without_duplicates(
        persona in persona_strategy(),
        added in prop::collection::vec("[a-z_]{1,8}", 0..6),
    ) {
        let enhancement = PersonaEnhancement::new(
            "e", "p", "tool", "extra", json!({ "tools": added.clone(), "append": true }), 0,
        );
        let result = compose(&persona, &[enhancement], None);

        prop_assert_eq!(&result.tools_access[..persona.tools_access.len()], &persona.tools_access[..]);
        for tool in &added {
            prop_assert!(result.tools_access.contains(tool));
        }
        let mut deduped = result.tools_access.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), result.tools_access.len());
    }

    #[test]
    fn application_order_is_ascending_priority(
        enhancements in prop::collection::vec(enhancement_strategy(), 0..8),
    ) {
        let ordered = order_for_application(&enhancements);
        prop_assert_eq!(ordered.len(), enhancements.len());
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].priority <= pair[1].priority);
        }
    }
}

#[test]
fn request_overrides_apply_after_enhancements() {
    let persona = PersonaConfig::new("p", "Dev", "1.0", "helps write code");
    let enhancements = vec![
        PersonaEnhancement::new("A", "p", "tool", "A", json!({"tools": ["search"], "append": false}), 5),
        PersonaEnhancement::new("B", "p", "weight", "B", json!({"weights": {"generate": 0.5}}), 1),
    ];
    let overrides = Overrides {
        temperature: Some(0.9),
        ..Overrides::default()
    };

    let result = compose(&persona, &enhancements, Some(&overrides));

    assert_eq!(result.tools_access, vec!["search"]);
    assert_eq!(result.behavior_weights["generate"], 0.5);
    assert_eq!(result.behavior_weights["decode"], 0.33);
    assert_eq!(result.temperature, 0.9);
    assert!(assemble(&persona).starts_with("You are Dev, helps write code."));
}
