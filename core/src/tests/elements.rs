use super::*;

#[test]
fn test_cycle_closure() {
    let rules = Ruleset::default();
    let chain = rules.elements();
    let order = chain.order();

    for &element in order {
        let adv = chain.advantage_target(element).unwrap();
        let dis = chain.disadvantage_target(element).unwrap();
        assert_ne!(adv, dis, "{element:?} neighbours must differ");
        assert!(order.contains(&adv) && order.contains(&dis));
        assert_ne!(chain.advantage_target(adv), Some(element));
        // Walking forward then back returns home
        assert_eq!(chain.disadvantage_target(adv), Some(element));
    }

    // Walking the whole chain returns to the start
    let mut current = order[0];
    for _ in 0..order.len() {
        current = chain.advantage_target(current).unwrap();
    }
    assert_eq!(current, order[0]);
}

#[test]
fn test_default_chain_multipliers() {
    let rules = Ruleset::default();
    let chain = rules.elements();

    assert_eq!(chain.multiplier(Element::Flame, Some(Element::Bloom)), 1.25);
    assert_eq!(chain.multiplier(Element::Flame, Some(Element::Aqua)), 0.8);
    // Last element wraps to the first
    assert_eq!(chain.multiplier(Element::Aqua, Some(Element::Flame)), 1.25);
    assert_eq!(chain.multiplier(Element::Flame, Some(Element::Flame)), 1.0);
    assert_eq!(chain.multiplier(Element::Flame, Some(Element::Volt)), 1.0);
}

#[test]
fn test_outliers_are_neutral() {
    let rules = Ruleset::default();
    let chain = rules.elements();

    assert_eq!(chain.multiplier(Element::Wild, Some(Element::Bloom)), 1.0);
    assert_eq!(chain.multiplier(Element::Flame, Some(Element::Wild)), 1.0);
    assert_eq!(chain.multiplier(Element::Flame, None), 1.0);
    assert_eq!(chain.multiplier(Element::Void, Some(Element::Flame)), 1.0);
    assert_eq!(chain.multiplier(Element::Flame, Some(Element::Void)), 1.0);
}

#[test]
fn test_wild_element_takes_advantage() {
    let rules = Ruleset::default();
    let chain = rules.elements();

    for &defender in chain.order() {
        let chosen = chain.choose_wild_element(Some(defender));
        assert_eq!(chain.multiplier(chosen, Some(defender)), 1.25);
    }
    assert_eq!(chain.choose_wild_element(Some(Element::Flame)), Element::Aqua);
    assert_eq!(chain.choose_wild_element(None), Element::Void);
    assert_eq!(chain.choose_wild_element(Some(Element::Wild)), Element::Void);
    assert_eq!(chain.choose_wild_element(Some(Element::Void)), Element::Void);
}
