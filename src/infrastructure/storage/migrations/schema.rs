//! Facility schema migrations

use super::Migration;
use crate::domain::agent::{
    Action, MAX_ABILITY_TICK, MAX_ACTION_LEVEL, MAX_HARM_LEVEL, MAX_HEAL, MAX_VIRTUE,
    MAX_VIRTUE_TICK,
};
use crate::domain::rules::{sql_enum_labels, EgoType, Rank, ThreatLevel, Trauma};
use crate::domain::tile::{MAX_TILE_X, MAX_TILE_Y};

/// Ordered migrations creating the facility schema
pub fn facility_migrations() -> Vec<Migration> {
    vec![
        Migration::new(1, "Create game rule enums", rule_enums_up(), rule_enums_down()),
        Migration::new(
            2,
            "Create departments and projects",
            r#"
            CREATE TABLE departments (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                buffs TEXT[] NOT NULL DEFAULT '{}',
                rabbited BOOLEAN NOT NULL DEFAULT FALSE
            );
            CREATE INDEX idx_departments_name ON departments(name);

            CREATE TABLE projects (
                id SERIAL PRIMARY KEY,
                name VARCHAR NOT NULL,
                description TEXT,
                max_clock INTEGER NOT NULL CHECK (max_clock >= 1),
                curr_tick INTEGER NOT NULL DEFAULT 0,
                CONSTRAINT curr_tick_within_clock CHECK (curr_tick >= 0 AND curr_tick <= max_clock)
            );

            CREATE TABLE project_department_association (
                department_id INTEGER NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                PRIMARY KEY (department_id, project_id)
            );
            "#,
            r#"
            DROP TABLE IF EXISTS project_department_association;
            DROP TABLE IF EXISTS projects;
            DROP TABLE IF EXISTS departments;
            "#,
        ),
        Migration::new(
            3,
            "Create tiles, abnormalities and egos",
            abnormalities_up(),
            r#"
            DROP TABLE IF EXISTS egos;
            DROP TABLE IF EXISTS abnormalities;
            DROP TABLE IF EXISTS tiles;
            "#,
        ),
        Migration::new(
            4,
            "Create agents and owned records",
            agents_up(),
            r#"
            DROP TABLE IF EXISTS clocks;
            DROP TABLE IF EXISTS harms;
            DROP TABLE IF EXISTS agent_ability_association;
            DROP TABLE IF EXISTS agent_ego_association;
            DROP TABLE IF EXISTS abilities;
            DROP TABLE IF EXISTS agents;
            "#,
        ),
    ]
}

fn rule_enums_up() -> String {
    let clock_cases = ThreatLevel::ALL
        .iter()
        .map(|t| format!("WHEN '{}' THEN {}", t, t.max_clock()))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"
        CREATE TYPE threat_levels_enum AS ENUM ({threats});
        CREATE TYPE rank_enum AS ENUM ({ranks});
        CREATE TYPE traumas_enum AS ENUM ({traumas});
        CREATE TYPE ego_types_enum AS ENUM ({egos});

        CREATE FUNCTION threat_clock_max(level threat_levels_enum) RETURNS INTEGER
            LANGUAGE SQL IMMUTABLE
            AS $$ SELECT CASE level {clock_cases} END $$;
        "#,
        threats = sql_enum_labels(&ThreatLevel::ALL),
        ranks = sql_enum_labels(&Rank::ALL),
        traumas = sql_enum_labels(&Trauma::ALL),
        egos = sql_enum_labels(&EgoType::ALL),
    )
}

fn rule_enums_down() -> String {
    r#"
    DROP FUNCTION IF EXISTS threat_clock_max(threat_levels_enum);
    DROP TYPE IF EXISTS ego_types_enum;
    DROP TYPE IF EXISTS traumas_enum;
    DROP TYPE IF EXISTS rank_enum;
    DROP TYPE IF EXISTS threat_levels_enum;
    "#
    .to_string()
}

fn abnormalities_up() -> String {
    let clock_checks = (1..=4)
        .map(|n| {
            format!(
                "CONSTRAINT clock_{n}_within_threat CHECK (clock_{n} >= 0 AND clock_{n} <= threat_clock_max(threat_level))"
            )
        })
        .collect::<Vec<_>>()
        .join(",\n                ");

    format!(
        r#"
        CREATE TABLE tiles (
            id SERIAL PRIMARY KEY,
            x INTEGER NOT NULL CHECK (x >= 0 AND x <= {max_x}),
            y INTEGER NOT NULL CHECK (y >= 0 AND y <= {max_y}),
            can_place_containment BOOLEAN NOT NULL,
            is_containment_unit BOOLEAN NOT NULL DEFAULT FALSE,
            is_working BOOLEAN,
            meltdown BOOLEAN,
            work_type VARCHAR,
            engagement_status VARCHAR,
            CONSTRAINT containment_needs_slot CHECK (can_place_containment OR NOT is_containment_unit),
            CONSTRAINT containment_state_needs_unit CHECK (
                is_containment_unit OR (
                    is_working IS NULL AND meltdown IS NULL
                    AND work_type IS NULL AND engagement_status IS NULL
                )
            ),
            UNIQUE (x, y)
        );

        CREATE TABLE abnormalities (
            id SERIAL PRIMARY KEY,
            tile_id INTEGER REFERENCES tiles(id) ON DELETE SET NULL,
            name VARCHAR NOT NULL,
            abno_code VARCHAR NOT NULL,
            blurb VARCHAR NOT NULL,
            current_status VARCHAR,
            threat_level threat_levels_enum NOT NULL,
            is_breaching BOOLEAN NOT NULL DEFAULT FALSE,
            is_working BOOLEAN NOT NULL DEFAULT FALSE,
            description TEXT NOT NULL,
            damage_type VARCHAR NOT NULL,
            favored_work VARCHAR NOT NULL,
            disfavored_work VARCHAR NOT NULL,
            can_breach BOOLEAN NOT NULL,
            weaknesses VARCHAR NOT NULL,
            resists VARCHAR NOT NULL,
            management_notes TEXT[] NOT NULL DEFAULT '{{}}',
            management_show INTEGER NOT NULL DEFAULT 0,
            stories TEXT[] NOT NULL DEFAULT '{{}}',
            story_show INTEGER NOT NULL DEFAULT 0,
            clock_1 INTEGER NOT NULL DEFAULT 0,
            clock_2 INTEGER NOT NULL DEFAULT 0,
            clock_3 INTEGER NOT NULL DEFAULT 0,
            clock_4 INTEGER NOT NULL DEFAULT 0,
            clock_4_finished BOOLEAN NOT NULL DEFAULT FALSE,
            player_notes TEXT,
            CONSTRAINT breaching_xor_working CHECK (NOT (is_breaching AND is_working)),
            CONSTRAINT management_show_within_notes CHECK (
                management_show >= 0 AND management_show <= cardinality(management_notes)
            ),
            CONSTRAINT story_show_within_stories CHECK (
                story_show >= 0 AND story_show <= cardinality(stories)
            ),
            {clock_checks}
        );

        CREATE TABLE egos (
            id SERIAL PRIMARY KEY,
            abnormality_id INTEGER NOT NULL REFERENCES abnormalities(id) ON DELETE CASCADE,
            type ego_types_enum NOT NULL,
            name VARCHAR NOT NULL,
            grade threat_levels_enum NOT NULL,
            effect VARCHAR NOT NULL,
            description TEXT
        );
        "#,
        max_x = MAX_TILE_X,
        max_y = MAX_TILE_Y,
    )
}

fn agents_up() -> String {
    let range = |column: &str, max: i32| {
        format!("{column} INTEGER NOT NULL DEFAULT 0 CHECK ({column} >= 0 AND {column} <= {max})")
    };

    let mut bounded = vec![
        range("physical_heal", MAX_HEAL),
        range("mental_heal", MAX_HEAL),
        range("ability_tick", MAX_ABILITY_TICK),
    ];

    for virtue in ["fortitude", "prudence", "temperance", "justice"] {
        bounded.push(range(virtue, MAX_VIRTUE));
        bounded.push(range(&format!("{virtue}_tick"), MAX_VIRTUE_TICK));
    }

    for action in Action::ALL {
        bounded.push(range(&format!("{}_lvl", action.as_str()), MAX_ACTION_LEVEL));
    }

    format!(
        r#"
        CREATE TABLE agents (
            id SERIAL PRIMARY KEY,
            tile_id INTEGER REFERENCES tiles(id) ON DELETE SET NULL,
            department_id INTEGER REFERENCES departments(id) ON DELETE SET NULL,
            abnormality_id INTEGER REFERENCES abnormalities(id) ON DELETE SET NULL,
            name VARCHAR NOT NULL,
            blurb VARCHAR,
            current_status VARCHAR,
            character_notes TEXT,
            rank rank_enum NOT NULL,
            stress INTEGER NOT NULL DEFAULT 0,
            traumas traumas_enum[] NOT NULL DEFAULT '{{}}',
            is_visible BOOLEAN NOT NULL DEFAULT TRUE,
            agent_exp INTEGER NOT NULL DEFAULT 0 CHECK (agent_exp >= 0),
            {bounded},
            CONSTRAINT stress_within_rank CHECK (
                stress >= 0 AND stress <= CASE rank WHEN 'Agent' THEN {agent_stress} ELSE {captain_stress} END
            ),
            CONSTRAINT traumas_within_rank CHECK (
                cardinality(traumas) <= CASE rank WHEN 'Agent' THEN {agent_traumas} ELSE {captain_traumas} END
            )
        );
        CREATE INDEX idx_agents_department ON agents(department_id);

        CREATE TABLE abilities (
            id SERIAL PRIMARY KEY,
            name VARCHAR NOT NULL,
            description TEXT
        );

        CREATE TABLE agent_ego_association (
            agent_id INTEGER NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
            ego_id INTEGER NOT NULL REFERENCES egos(id) ON DELETE CASCADE,
            PRIMARY KEY (agent_id, ego_id)
        );

        CREATE TABLE agent_ability_association (
            agent_id INTEGER NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
            ability_id INTEGER NOT NULL REFERENCES abilities(id) ON DELETE CASCADE,
            PRIMARY KEY (agent_id, ability_id)
        );

        CREATE TABLE harms (
            id SERIAL PRIMARY KEY,
            agent_id INTEGER NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
            level INTEGER NOT NULL CHECK (level >= 0 AND level <= {max_harm}),
            is_physical BOOLEAN NOT NULL,
            description TEXT
        );

        CREATE TABLE clocks (
            id SERIAL PRIMARY KEY,
            agent_id INTEGER REFERENCES agents(id) ON DELETE CASCADE,
            abnormality_id INTEGER REFERENCES abnormalities(id) ON DELETE CASCADE,
            max_count INTEGER NOT NULL CHECK (max_count >= 1),
            tick_count INTEGER NOT NULL DEFAULT 0,
            important BOOLEAN NOT NULL DEFAULT FALSE,
            CONSTRAINT relationship_constraint CHECK (
                (agent_id IS NULL AND abnormality_id IS NOT NULL)
                OR (agent_id IS NOT NULL AND abnormality_id IS NULL)
            ),
            CONSTRAINT tick_within_clock CHECK (tick_count >= 0 AND tick_count <= max_count)
        );
        "#,
        bounded = bounded.join(",\n            "),
        agent_stress = Rank::Agent.max_stress(),
        captain_stress = Rank::Captain.max_stress(),
        agent_traumas = Rank::Agent.max_traumas(),
        captain_traumas = Rank::Captain.max_traumas(),
        max_harm = MAX_HARM_LEVEL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_migrations_order() {
        let migrations = facility_migrations();

        assert!(!migrations.is_empty());

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_facility_migrations_content() {
        for migration in facility_migrations() {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.trim().is_empty());
            assert!(!migration.down.trim().is_empty());
        }
    }

    #[test]
    fn test_enum_labels_follow_rules() {
        let up = rule_enums_up();

        assert!(up.contains("'ZAYIN', 'TETH', 'HE', 'WAW', 'ALEPH'"));
        assert!(up.contains("'Agent', 'Captain'"));
        assert!(up.contains("WHEN 'ALEPH' THEN 10"));
    }

    #[test]
    fn test_every_table_created() {
        let all: String = facility_migrations().into_iter().map(|m| m.up).collect();

        for table in [
            "departments",
            "projects",
            "project_department_association",
            "tiles",
            "abnormalities",
            "egos",
            "agents",
            "abilities",
            "agent_ego_association",
            "agent_ability_association",
            "harms",
            "clocks",
        ] {
            assert!(
                all.contains(&format!("CREATE TABLE {} (", table)),
                "missing table {}",
                table
            );
        }
    }

    #[test]
    fn test_agent_columns_bounded() {
        let up = agents_up();

        assert!(up.contains("skirmish_lvl INTEGER NOT NULL DEFAULT 0 CHECK (skirmish_lvl >= 0 AND skirmish_lvl <= 4)"));
        assert!(up.contains("justice_tick INTEGER NOT NULL DEFAULT 0 CHECK (justice_tick >= 0 AND justice_tick <= 6)"));
        assert!(up.contains("WHEN 'Agent' THEN 6 ELSE 8"));
    }

    #[test]
    fn test_literal_braces_escaped() {
        assert!(abnormalities_up().contains("DEFAULT '{}'"));
        assert!(agents_up().contains("traumas_enum[] NOT NULL DEFAULT '{}'"));
    }
}
