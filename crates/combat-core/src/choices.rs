//! Available-choice generation for decision points.
//!
//! The engine offers the active combatant one structured choice per legal
//! intent: a melee (and, with a ranged weapon, ranged) attack per living
//! opponent, castable catalog spells shaped by their target mode, and the
//! reserved flee intent.

use crate::context::EncounterContext;
use crate::id::{CombatantId, Side};
use crate::intent::{ActionChoice, Intent};
use crate::spellbook::{all_spells, SpellDefinition, TargetMode};

/// Builds the choice list for `actor_id`.
pub fn available_choices(
    ctx: &EncounterContext<'_>,
    actor_id: &CombatantId,
) -> Vec<ActionChoice> {
    let Some(actor) = ctx.combatant(actor_id) else {
        return Vec::new();
    };
    let side = actor.side;
    let opponents: Vec<(CombatantId, String)> = ctx
        .living(side.opponent())
        .into_iter()
        .map(|c| (c.id.clone(), c.id.display_name()))
        .collect();
    let allies: Vec<(CombatantId, String)> = ctx
        .living(side)
        .into_iter()
        .map(|c| (c.id.clone(), c.id.display_name()))
        .collect();

    let mut choices = Vec::new();

    for (target_id, target_name) in &opponents {
        choices.push(ActionChoice::new(
            "attack_target",
            [
                ("target_id", target_id.to_string()),
                ("target_name", target_name.clone()),
            ],
            Intent::MeleeAttack {
                actor_id: actor_id.clone(),
                target_id: target_id.clone(),
            },
        ));
    }

    if side == Side::Party && actor.entity.ranged_damage_die().is_some() {
        for (target_id, target_name) in &opponents {
            choices.push(ActionChoice::new(
                "ranged_attack_target",
                [
                    ("target_id", target_id.to_string()),
                    ("target_name", target_name.clone()),
                ],
                Intent::RangedAttack {
                    actor_id: actor_id.clone(),
                    target_id: target_id.clone(),
                },
            ));
        }
    }

    if let Some(caster) = actor.entity.as_caster() {
        for spell in all_spells() {
            if !spell.usable_by.contains(&caster.class()) {
                continue;
            }
            // Exhausted spells drop off the menu; static ineligibility is
            // caught here, remaining-count exhaustion at apply time.
            if caster.slots_at(spell.level) == 0
                || ctx.slots_remaining(actor_id, spell.level) == 0
            {
                continue;
            }
            push_spell_choices(&mut choices, actor_id, spell, &opponents, &allies);
        }
    }

    choices.push(ActionChoice::new(
        "flee",
        [],
        Intent::Flee {
            actor_id: actor_id.clone(),
        },
    ));

    choices
}

fn push_spell_choices(
    choices: &mut Vec<ActionChoice>,
    actor_id: &CombatantId,
    spell: &SpellDefinition,
    opponents: &[(CombatantId, String)],
    allies: &[(CombatantId, String)],
) {
    let cast = |target_ids: Vec<CombatantId>| Intent::CastSpell {
        actor_id: actor_id.clone(),
        spell_id: spell.spell_id.to_string(),
        slot_level: spell.level,
        target_ids,
    };
    let base_args = |target: Option<&(CombatantId, String)>| {
        let mut args = vec![
            ("spell_id", spell.spell_id.to_string()),
            ("spell_name", spell.name.to_string()),
        ];
        if let Some((target_id, target_name)) = target {
            args.push(("target_id", target_id.to_string()));
            args.push(("target_name", target_name.clone()));
        }
        args
    };

    match spell.target_mode {
        TargetMode::SingleEnemy => {
            for target in opponents {
                choices.push(ActionChoice::new(
                    "cast_spell",
                    base_args(Some(target)),
                    cast(vec![target.0.clone()]),
                ));
            }
        }
        TargetMode::SingleAlly => {
            for target in allies {
                choices.push(ActionChoice::new(
                    "cast_spell",
                    base_args(Some(target)),
                    cast(vec![target.0.clone()]),
                ));
            }
        }
        TargetMode::Caster => {
            choices.push(ActionChoice::new(
                "cast_spell",
                base_args(None),
                cast(Vec::new()),
            ));
        }
        TargetMode::AllEnemies => {
            choices.push(ActionChoice::new(
                "cast_spell",
                base_args(None),
                cast(opponents.iter().map(|(id, _)| id.clone()).collect()),
            ));
        }
        TargetMode::AllAllies => {
            choices.push(ActionChoice::new(
                "cast_spell",
                base_args(None),
                cast(allies.iter().map(|(id, _)| id.clone()).collect()),
            ));
        }
    }
}
