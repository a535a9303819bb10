//! Spell flow through the full engine: slots, rejections, conditions, buffs.

mod common;

use combat_core::{
    CombatEngine, CombatantId, Event, Intent, RejectionCode, StepResult,
};
use common::{as_dyn, TestCombatant};
use dice_roller::FixedDice;

fn collect_events(results: &[StepResult]) -> Vec<Event> {
    results
        .iter()
        .flat_map(|result| result.events.iter().cloned())
        .collect()
}

fn cast(actor: &CombatantId, spell_id: &str, slot_level: u8, targets: Vec<CombatantId>) -> Intent {
    Intent::CastSpell {
        actor_id: actor.clone(),
        spell_id: spell_id.to_string(),
        slot_level,
        target_ids: targets,
    }
}

#[test]
fn magic_missile_consumes_the_slot_then_lands() {
    let mut zil = TestCombatant::magic_user("Zil", 6, 1);
    let mut goblin = TestCombatant::goblin("Goblin", 10);
    let zil_id = CombatantId::pc("Zil");
    let gob_id = CombatantId::monster("Goblin", 0);
    // Surprise 3/3; round 1 initiative 6/1; missile damage 5; goblin's reply
    // misses with a 2; round 2 initiative 6/1; second missile damage 5.
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut zil]))
        .opposition(as_dyn(vec![&mut goblin]))
        .dice(FixedDice::new([3, 3, 6, 1, 5, 0, 2, 6, 1, 5]))
        .encounter_id("e-missile")
        .build();

    engine.step_until_decision(None, 64).unwrap();
    let events = collect_events(
        &engine
            .step_until_decision(Some(cast(&zil_id, "magic_missile", 1, vec![gob_id.clone()])), 64)
            .unwrap(),
    );

    let position = |kind: &str| events.iter().position(|e| e.kind() == kind);
    let cast_at = position("SpellCast").expect("first cast resolves");
    let slot_at = position("SpellSlotConsumed").expect("slot is consumed");
    let damage_at = position("DamageApplied").expect("missile lands");
    assert!(cast_at < slot_at && slot_at < damage_at);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::SpellSlotConsumed {
            level: 1,
            remaining: 0,
            ..
        }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::DamageApplied {
            amount: 5,
            target_hp_after: 5,
            ..
        }
    )));

    // Second cast: the resolution event still fires, but the spent slot
    // stops everything at apply time. No damage lands.
    let events = collect_events(
        &engine
            .step_until_decision(Some(cast(&zil_id, "magic_missile", 1, vec![gob_id.clone()])), 64)
            .unwrap(),
    );
    let cast_at = events
        .iter()
        .position(|e| e.kind() == "SpellCast")
        .expect("second cast still resolves");
    let rejected_at = events
        .iter()
        .position(|e| matches!(
            e,
            Event::ActionRejected { reasons, .. }
                if reasons.iter().any(|r| r.code == RejectionCode::NoSpellSlot)
        ))
        .expect("slot exhaustion surfaces as a rejection");
    assert!(cast_at < rejected_at);
    assert!(!events.iter().any(|e| e.kind() == "DamageApplied"));
    assert!(!events.iter().any(|e| e.kind() == "SpellSlotConsumed"));
    // The engine falls back to a fresh decision point for the same caster.
    assert!(events.iter().any(|e| matches!(
        e,
        Event::NeedAction { id, .. } if id == &CombatantId::pc("Zil")
    )));
}

#[test]
fn hold_person_at_the_wrong_slot_level_is_a_mismatch() {
    let mut ansel = TestCombatant::cleric("Ansel", 8, 2, 1);
    let mut goblin = TestCombatant::goblin("Goblin", 6);
    let ansel_id = CombatantId::pc("Ansel");
    let gob_id = CombatantId::monster("Goblin", 0);
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut ansel]))
        .opposition(as_dyn(vec![&mut goblin]))
        .dice(FixedDice::new([3, 3, 5, 2]))
        .encounter_id("e-mismatch")
        .build();

    engine.step_until_decision(None, 64).unwrap();
    let events = collect_events(
        &engine
            .step_until_decision(Some(cast(&ansel_id, "hold_person", 1, vec![gob_id])), 64)
            .unwrap(),
    );

    match events.first() {
        Some(Event::ActionRejected { reasons, .. }) => {
            assert_eq!(reasons.len(), 1);
            assert_eq!(reasons[0].code, RejectionCode::SlotLevelMismatch);
        }
        other => panic!("expected immediate rejection, got {other:?}"),
    }
    assert!(!events.iter().any(|e| e.kind() == "SpellCast"));
    assert!(!events.iter().any(|e| e.kind() == "SpellSlotConsumed"));
}

#[test]
fn magic_users_cannot_borrow_divine_spells() {
    let mut zil = TestCombatant::magic_user("Zil", 6, 1);
    let mut goblin = TestCombatant::goblin("Goblin", 6);
    let zil_id = CombatantId::pc("Zil");
    let gob_id = CombatantId::monster("Goblin", 0);
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut zil]))
        .opposition(as_dyn(vec![&mut goblin]))
        .dice(FixedDice::new([3, 3, 5, 2]))
        .encounter_id("e-ineligible")
        .build();

    engine.step_until_decision(None, 64).unwrap();
    let events = collect_events(
        &engine
            .step_until_decision(Some(cast(&zil_id, "hold_person", 2, vec![gob_id])), 64)
            .unwrap(),
    );

    match events.first() {
        Some(Event::ActionRejected { reasons, .. }) => {
            assert!(reasons
                .iter()
                .any(|r| r.code == RejectionCode::IneligibleCaster));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(!events.iter().any(|e| e.kind() == "SpellCast"));
}

#[test]
fn hold_person_locks_the_target_out_of_its_turns() {
    let mut ansel = TestCombatant::cleric("Ansel", 10, 2, 1);
    let mut goblin = TestCombatant::goblin("Goblin", 8);
    let ansel_id = CombatantId::pc("Ansel");
    let gob_id = CombatantId::monster("Goblin", 0);
    // Ansel wins initiative both rounds; the held goblin never acts.
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut ansel]))
        .opposition(as_dyn(vec![&mut goblin]))
        .dice(FixedDice::new([3, 3, 6, 2, 6, 2]))
        .encounter_id("e-hold")
        .build();

    engine.step_until_decision(None, 64).unwrap();
    let events = collect_events(
        &engine
            .step_until_decision(Some(cast(&ansel_id, "hold_person", 2, vec![gob_id.clone()])), 64)
            .unwrap(),
    );

    assert!(events.iter().any(|e| matches!(
        e,
        Event::ConditionApplied {
            condition_id,
            duration: Some(9),
            ..
        } if condition_id == "held"
    )));
    let skip = events
        .iter()
        .find(|e| matches!(e, Event::TurnSkipped { .. }))
        .expect("the held goblin's turn is skipped");
    match skip {
        Event::TurnSkipped { id, reason } => {
            assert_eq!(id, &gob_id);
            assert_eq!(reason, "held");
        }
        _ => unreachable!(),
    }
}

#[test]
fn sleep_blankets_the_opposition_and_breaks_on_damage() {
    let mut zil = TestCombatant::magic_user("Zil", 6, 1);
    let mut goblin_a = TestCombatant::goblin("Goblin", 8);
    let mut goblin_b = TestCombatant::goblin("Goblin", 8);
    let zil_id = CombatantId::pc("Zil");
    // Round 1: sleep (no damage roll). Both goblin turns are skipped.
    // Round 2: Zil clubs the first sleeper awake; it retaliates and misses
    // while the second goblin sleeps on.
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut zil]))
        .opposition(as_dyn(vec![&mut goblin_a, &mut goblin_b]))
        .dice(FixedDice::new([3, 3, 6, 2, 6, 2, 15, 2, 0, 2, 6, 2]))
        .encounter_id("e-sleep")
        .build();

    engine.step_until_decision(None, 64).unwrap();
    let round_one = collect_events(
        &engine
            .step_until_decision(Some(cast(&zil_id, "sleep", 1, vec![])), 64)
            .unwrap(),
    );

    let conditions = round_one
        .iter()
        .filter(|e| matches!(e, Event::ConditionApplied { condition_id, .. } if condition_id == "asleep"))
        .count();
    assert_eq!(conditions, 2);
    let skips = round_one
        .iter()
        .filter(|e| matches!(e, Event::TurnSkipped { reason, .. } if reason == "asleep"))
        .count();
    assert_eq!(skips, 2);

    // Round 2: a melee hit wakes the target.
    let round_two = collect_events(
        &engine
            .step_until_decision(
                Some(Intent::MeleeAttack {
                    actor_id: zil_id.clone(),
                    target_id: CombatantId::monster("Goblin", 0),
                }),
                64,
            )
            .unwrap(),
    );
    assert!(round_two.iter().any(|e| matches!(
        e,
        Event::ConditionExpired {
            condition_id,
            reason,
            ..
        } if condition_id == "asleep" && reason == "damage"
    )));
}

#[test]
fn shield_is_self_cast_and_buffs_armor_class() {
    let mut zil = TestCombatant::magic_user("Zil", 6, 1);
    let mut goblin = TestCombatant::goblin("Goblin", 8);
    let zil_id = CombatantId::pc("Zil");
    // Zil shields up; the goblin then needs 12 instead of 10 to connect and
    // whiffs with an 11.
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut zil]))
        .opposition(as_dyn(vec![&mut goblin]))
        .dice(FixedDice::new([3, 3, 6, 2, 0, 11, 6, 2]))
        .encounter_id("e-shield")
        .build();

    engine.step_until_decision(None, 64).unwrap();
    let events = collect_events(
        &engine
            .step_until_decision(Some(cast(&zil_id, "shield", 1, vec![])), 64)
            .unwrap(),
    );

    assert!(events.iter().any(|e| matches!(
        e,
        Event::SpellCast { target_ids, .. } if target_ids == &vec![zil_id.clone()]
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::ModifierApplied {
            value: -2,
            duration: 12,
            ..
        }
    )));
    let goblin_swing = events
        .iter()
        .find(|e| matches!(e, Event::AttackRolled { .. }))
        .expect("the goblin answers");
    assert!(matches!(
        goblin_swing,
        Event::AttackRolled {
            needed: 12,
            hit: false,
            ..
        }
    ));
}

#[test]
fn cure_light_wounds_heals_an_ally_through_the_pipeline() {
    let mut ansel = TestCombatant::cleric("Ansel", 10, 2, 1);
    let mut hero = TestCombatant::fighter("Hero", 12).with_current_hp(5);
    let mut goblin = TestCombatant::goblin("Goblin", 8);
    let ansel_id = CombatantId::pc("Ansel");
    let hero_id = CombatantId::pc("Hero");
    // Heal roll of 4 brings the hero from 5 to 9 of 12.
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut ansel, &mut hero]))
        .opposition(as_dyn(vec![&mut goblin]))
        .dice(FixedDice::new([3, 3, 6, 2, 4]))
        .encounter_id("e-cure")
        .build();

    engine.step_until_decision(None, 64).unwrap();
    let events = collect_events(
        &engine
            .step_until_decision(
                Some(cast(&ansel_id, "cure_light_wounds", 1, vec![hero_id.clone()])),
                64,
            )
            .unwrap(),
    );

    assert!(events.iter().any(|e| matches!(
        e,
        Event::HealingApplied {
            amount: 4,
            target_hp_after: 9,
            ..
        }
    )));
    drop(engine);
    assert_eq!(hero.current_hp(), 9);
}

#[test]
fn menus_offer_spells_shaped_by_the_catalog() {
    let mut zil = TestCombatant::magic_user("Zil", 6, 1);
    let mut goblin_a = TestCombatant::goblin("Goblin", 8);
    let mut goblin_b = TestCombatant::goblin("Goblin", 8);
    let mut engine = CombatEngine::builder()
        .party(as_dyn(vec![&mut zil]))
        .opposition(as_dyn(vec![&mut goblin_a, &mut goblin_b]))
        .dice(FixedDice::new([3, 3, 6, 2]))
        .encounter_id("e-menu")
        .build();

    let results = engine.step_until_decision(None, 64).unwrap();
    let events = collect_events(&results);
    let available = events
        .iter()
        .find_map(|e| match e {
            Event::NeedAction { available, .. } => Some(available.clone()),
            _ => None,
        })
        .expect("Zil gets a menu");

    let labels: Vec<String> = available.iter().map(|c| c.label()).collect();
    assert!(labels.contains(&"Attack Goblin #1".to_string()));
    assert!(labels.contains(&"Cast Magic Missile on Goblin #2".to_string()));
    assert!(labels.contains(&"Cast Sleep".to_string()));
    assert!(labels.contains(&"Cast Shield".to_string()));
    assert!(labels.contains(&"Flee".to_string()));
}
