//! Shipped balance data.

use lane_defence_core::{
    AbilityKind, CellCoord, Difficulty, EnemyKind, StatusEffect, StatusKind, TowerKind,
};

use crate::{
    AbilityStats, AbilityTable, AchievementCondition, AchievementDef, AttackBehavior,
    DifficultyRow, DifficultyTable, EnemyStats, EnemyTable, HealAura, MapLayout, Rules, Tables,
    TowerStats, TowerTable, Wave,
};

pub(crate) fn tables() -> Tables {
    Tables {
        rules: rules(),
        towers: TowerTable(towers()),
        enemies: EnemyTable(enemies()),
        waves: waves(),
        difficulties: DifficultyTable(difficulties()),
        maps: maps(),
        abilities: AbilityTable(abilities()),
        achievements: achievements(),
    }
}

fn rules() -> Rules {
    Rules {
        columns: 20,
        rows: 15,
        cell_size: 40.0,
        starting_health: 20,
        starting_money: 650,
        spawn_interval: 0.5,
        health_growth_per_wave: 0.15,
        reward_growth_per_wave: 0.1,
        upgrade_cost_growth: 1.5,
        upgrade_damage_growth: 1.5,
        upgrade_range_growth: 1.1,
        upgrade_fire_rate_growth: 1.2,
        sell_fraction: 0.7,
        chain_distance: 150.0,
        projectile_max_travel: 1500.0,
        leak_damage: 1,
    }
}

fn tower(
    kind: TowerKind,
    cost: u32,
    damage: u32,
    range: u32,
    fire_rate: f32,
    projectile_speed: f32,
    behavior: AttackBehavior,
) -> TowerStats {
    TowerStats {
        kind,
        cost,
        damage,
        range,
        fire_rate,
        projectile_speed,
        hits_flying: true,
        behavior,
    }
}

// Rows must stay in `TowerKind` declaration order.
fn towers() -> Vec<TowerStats> {
    vec![
        tower(TowerKind::Basic, 100, 10, 120, 1.0, 8.0, AttackBehavior::Direct),
        tower(TowerKind::Sniper, 200, 50, 250, 0.5, 15.0, AttackBehavior::Direct),
        tower(TowerKind::Rapid, 150, 5, 100, 3.0, 10.0, AttackBehavior::Direct),
        tower(
            TowerKind::Splash,
            250,
            15,
            110,
            0.8,
            6.0,
            AttackBehavior::Splash { radius: 60.0 },
        ),
        tower(TowerKind::Laser, 300, 8, 150, 10.0, 0.0, AttackBehavior::Beam),
        tower(
            TowerKind::Ice,
            175,
            5,
            110,
            1.0,
            8.0,
            AttackBehavior::Status {
                effect: StatusEffect::new(StatusKind::Slow, 2.0, 0.5),
            },
        ),
        tower(
            TowerKind::Poison,
            200,
            5,
            120,
            0.8,
            8.0,
            AttackBehavior::Status {
                effect: StatusEffect::new(StatusKind::Poison, 4.0, 5.0),
            },
        ),
        tower(
            TowerKind::Electric,
            275,
            20,
            130,
            0.7,
            15.0,
            AttackBehavior::Chain {
                count: 4,
                reduction: 0.7,
            },
        ),
        TowerStats {
            hits_flying: false,
            ..tower(
                TowerKind::Artillery,
                400,
                40,
                200,
                0.3,
                5.0,
                AttackBehavior::Splash { radius: 90.0 },
            )
        },
        tower(
            TowerKind::Support,
            250,
            0,
            0,
            0.0,
            0.0,
            AttackBehavior::Support {
                buff_range: 120.0,
                damage_buff: 1.25,
            },
        ),
        tower(
            TowerKind::Flame,
            225,
            8,
            90,
            2.0,
            8.0,
            AttackBehavior::Status {
                effect: StatusEffect::new(StatusKind::Burn, 3.0, 8.0),
            },
        ),
    ]
}

fn enemy(kind: EnemyKind, health: f32, speed: f32, reward: u32, size: f32) -> EnemyStats {
    EnemyStats {
        kind,
        health,
        speed,
        reward,
        size,
        armor: 0.0,
        shield: 0.0,
        shield_regen: 0.0,
        regen: 0.0,
        heal: None,
        flying: false,
        boss: false,
        immune_to_slow: false,
    }
}

// Rows must stay in `EnemyKind` declaration order.
fn enemies() -> Vec<EnemyStats> {
    vec![
        enemy(EnemyKind::Basic, 50.0, 2.0, 10, 8.0),
        enemy(EnemyKind::Fast, 30.0, 4.0, 15, 7.0),
        enemy(EnemyKind::Tank, 200.0, 1.0, 30, 12.0),
        enemy(EnemyKind::Swarm, 20.0, 3.0, 5, 6.0),
        EnemyStats {
            boss: true,
            immune_to_slow: true,
            ..enemy(EnemyKind::Boss, 500.0, 0.8, 100, 16.0)
        },
        EnemyStats {
            armor: 0.5,
            ..enemy(EnemyKind::Armored, 120.0, 1.5, 20, 10.0)
        },
        EnemyStats {
            shield: 60.0,
            shield_regen: 5.0,
            ..enemy(EnemyKind::Shielded, 80.0, 1.8, 25, 9.0)
        },
        EnemyStats {
            heal: Some(HealAura {
                range: 80.0,
                amount: 10.0,
                interval: 2.0,
            }),
            ..enemy(EnemyKind::Healer, 70.0, 1.6, 25, 9.0)
        },
        EnemyStats {
            regen: 4.0,
            ..enemy(EnemyKind::Regenerator, 100.0, 1.8, 20, 9.0)
        },
        EnemyStats {
            flying: true,
            ..enemy(EnemyKind::Flyer, 40.0, 3.0, 20, 7.0)
        },
    ]
}

fn waves() -> Vec<Wave> {
    use EnemyKind::{Armored, Basic, Boss, Fast, Flyer, Healer, Regenerator, Shielded, Swarm, Tank};

    vec![
        Wave::from_pairs(&[(Basic, 10)]),
        Wave::from_pairs(&[(Basic, 15), (Fast, 5)]),
        Wave::from_pairs(&[(Basic, 10), (Fast, 10)]),
        Wave::from_pairs(&[(Basic, 20), (Tank, 2)]),
        Wave::from_pairs(&[(Fast, 15), (Tank, 3)]),
        Wave::from_pairs(&[(Basic, 25), (Fast, 15), (Swarm, 10)]),
        Wave::from_pairs(&[(Tank, 5), (Fast, 20)]),
        Wave::from_pairs(&[(Basic, 30), (Fast, 20), (Tank, 5)]),
        Wave::from_pairs(&[(Swarm, 30), (Tank, 8)]),
        Wave::from_pairs(&[(Boss, 1), (Basic, 20), (Fast, 20)]),
        Wave::from_pairs(&[(Basic, 40), (Fast, 30), (Tank, 10), (Swarm, 20)]),
        Wave::from_pairs(&[(Basic, 50), (Fast, 40), (Tank, 15), (Boss, 1)]),
        Wave::from_pairs(&[(Swarm, 50), (Tank, 20), (Fast, 30)]),
        Wave::from_pairs(&[(Basic, 60), (Fast, 50), (Tank, 20), (Boss, 2)]),
        Wave::from_pairs(&[(Swarm, 80), (Tank, 30), (Boss, 1)]),
        Wave::from_pairs(&[(Armored, 15), (Flyer, 20), (Basic, 40)]),
        Wave::from_pairs(&[(Shielded, 20), (Healer, 8), (Fast, 40)]),
        Wave::from_pairs(&[(Regenerator, 25), (Armored, 20), (Flyer, 30), (Tank, 20)]),
        Wave::from_pairs(&[(Shielded, 30), (Healer, 15), (Regenerator, 30), (Boss, 2)]),
        Wave::from_pairs(&[
            (Armored, 40),
            (Shielded, 40),
            (Flyer, 40),
            (Healer, 20),
            (Boss, 3),
        ]),
    ]
}

fn difficulties() -> Vec<DifficultyRow> {
    vec![
        DifficultyRow {
            difficulty: Difficulty::Easy,
            health_multiplier: 1.5,
            money_multiplier: 1.5,
            enemy_health_multiplier: 0.75,
            enemy_speed_multiplier: 0.9,
        },
        DifficultyRow {
            difficulty: Difficulty::Normal,
            health_multiplier: 1.0,
            money_multiplier: 1.0,
            enemy_health_multiplier: 1.0,
            enemy_speed_multiplier: 1.0,
        },
        DifficultyRow {
            difficulty: Difficulty::Hard,
            health_multiplier: 0.75,
            money_multiplier: 0.8,
            enemy_health_multiplier: 1.35,
            enemy_speed_multiplier: 1.15,
        },
    ]
}

fn layout(name: &str, corners: &[(u32, u32)]) -> MapLayout {
    MapLayout {
        name: name.to_owned(),
        corners: corners
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect(),
    }
}

fn maps() -> Vec<MapLayout> {
    vec![
        layout(
            "classic",
            &[(0, 7), (6, 7), (6, 10), (12, 10), (12, 3), (17, 3), (17, 14)],
        ),
        layout(
            "zigzag",
            &[
                (2, 0),
                (2, 12),
                (7, 12),
                (7, 2),
                (12, 2),
                (12, 12),
                (16, 12),
                (16, 5),
                (19, 5),
            ],
        ),
        layout(
            "spiral",
            &[
                (0, 1),
                (18, 1),
                (18, 13),
                (2, 13),
                (2, 4),
                (15, 4),
                (15, 10),
                (6, 10),
            ],
        ),
    ]
}

// Rows must stay in `AbilityKind` declaration order.
fn abilities() -> Vec<AbilityStats> {
    vec![
        AbilityStats {
            kind: AbilityKind::Airstrike,
            cost: 150,
            cooldown: 30.0,
            duration: 0.0,
            magnitude: 100.0,
            radius: 100.0,
        },
        AbilityStats {
            kind: AbilityKind::FreezeAll,
            cost: 200,
            cooldown: 45.0,
            duration: 3.0,
            magnitude: 0.0,
            radius: 0.0,
        },
        AbilityStats {
            kind: AbilityKind::CashBoost,
            cost: 100,
            cooldown: 60.0,
            duration: 15.0,
            magnitude: 2.0,
            radius: 0.0,
        },
        AbilityStats {
            kind: AbilityKind::DamageBoost,
            cost: 150,
            cooldown: 50.0,
            duration: 10.0,
            magnitude: 2.5,
            radius: 0.0,
        },
        AbilityStats {
            kind: AbilityKind::HealthRestore,
            cost: 250,
            cooldown: 90.0,
            duration: 0.0,
            magnitude: 5.0,
            radius: 0.0,
        },
    ]
}

fn achievement(
    id: &str,
    name: &str,
    condition: AchievementCondition,
    threshold: u64,
) -> AchievementDef {
    AchievementDef {
        id: id.to_owned(),
        name: name.to_owned(),
        condition,
        threshold,
    }
}

fn achievements() -> Vec<AchievementDef> {
    use AchievementCondition::{
        BossKills, Kills, MoneyEarned, PerfectWave, TowersBuilt, Upgrades, Waves,
    };

    vec![
        achievement("first_blood", "First Blood", Kills, 1),
        achievement("exterminator", "Exterminator", Kills, 500),
        achievement("boss_slayer", "Boss Slayer", BossKills, 1),
        achievement("architect", "Architect", TowersBuilt, 25),
        achievement("survivor", "Survivor", Waves, 10),
        achievement("tycoon", "Tycoon", MoneyEarned, 10_000),
        achievement("flawless", "Flawless", PerfectWave, 1),
        achievement("tinkerer", "Tinkerer", Upgrades, 10),
    ]
}
