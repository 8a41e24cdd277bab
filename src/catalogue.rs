//! Built-in strike topology: five cities, each with its bases listed before
//! the home base so that the home node is always the last index.

use crate::locations::{Base, GraphError, LocationGraph};

type BaseRow = (&'static str, f32, f32, u32, &'static [(usize, f32)]);

const KARACHI: &[BaseRow] = &[
    ("Karachi Naval Base", 7.0, 8.0, 5, &[(7, 4.0), (2, 6.0)]),
    ("Karachi Port", 9.0, 6.0, 3, &[(7, 5.0), (0, 6.0)]),
    ("Karachi Airbase", 14.0, 12.0, 4, &[(7, 8.0), (5, 6.0)]),
    ("Karachi Command", 26.0, 24.0, 2, &[(7, 22.0), (6, 8.0)]),
    ("Karachi Industrial", 30.0, 20.0, 4, &[(7, 25.0), (6, 6.0)]),
    ("Karachi Defense HQ", 18.0, 16.0, 5, &[(7, 12.0)]),
    ("Karachi Radar Station", 28.0, 26.0, 3, &[(7, 28.0)]),
    (
        "Home Base",
        5.0,
        5.0,
        0,
        &[(0, 4.0), (1, 5.0), (2, 8.0), (3, 22.0), (4, 25.0), (5, 12.0), (6, 28.0)],
    ),
];

const LAHORE: &[BaseRow] = &[
    ("Lahore Garrison", 7.0, 9.0, 4, &[(5, 4.0)]),
    ("Lahore Cantonment", 10.0, 8.0, 5, &[(5, 6.0)]),
    ("Lahore Arsenal", 15.0, 14.0, 3, &[(5, 10.0)]),
    ("Lahore Depot", 26.0, 24.0, 2, &[(5, 22.0)]),
    ("Lahore Military Academy", 30.0, 22.0, 4, &[(5, 26.0)]),
    (
        "Home Base",
        5.0,
        5.0,
        0,
        &[(0, 4.0), (1, 6.0), (2, 10.0), (3, 22.0), (4, 26.0)],
    ),
];

const ISLAMABAD: &[BaseRow] = &[
    ("ISB Command Center", 7.0, 7.0, 5, &[(6, 3.0)]),
    ("ISB Strategic Base", 9.0, 10.0, 4, &[(6, 5.0)]),
    ("ISB Defense HQ", 14.0, 12.0, 3, &[(6, 8.0)]),
    ("ISB Reserve Base", 22.0, 24.0, 2, &[(6, 18.0)]),
    ("ISB Intelligence Center", 26.0, 28.0, 5, &[(6, 24.0)]),
    ("ISB Operations Base", 30.0, 30.0, 4, &[(6, 28.0)]),
    (
        "Home Base",
        5.0,
        5.0,
        0,
        &[(0, 3.0), (1, 5.0), (2, 8.0), (3, 18.0), (4, 24.0), (5, 28.0)],
    ),
];

const PESHAWAR: &[BaseRow] = &[
    ("Peshawar Fort", 7.0, 8.0, 3, &[(8, 4.0)]),
    ("Peshawar Airfield", 10.0, 9.0, 5, &[(8, 6.0)]),
    ("Peshawar Outpost", 14.0, 12.0, 4, &[(8, 8.0)]),
    ("Peshawar Supply", 26.0, 26.0, 2, &[(8, 22.0)]),
    ("Peshawar Border Post", 30.0, 20.0, 4, &[(8, 26.0)]),
    ("Peshawar Training Camp", 18.0, 16.0, 3, &[(8, 12.0)]),
    ("Peshawar Communication Hub", 28.0, 28.0, 5, &[(8, 28.0)]),
    ("Peshawar Logistics Center", 12.0, 14.0, 3, &[(8, 10.0)]),
    (
        "Home Base",
        5.0,
        5.0,
        0,
        &[
            (0, 4.0),
            (1, 6.0),
            (2, 8.0),
            (3, 22.0),
            (4, 26.0),
            (5, 12.0),
            (6, 28.0),
            (7, 10.0),
        ],
    ),
];

const QUETTA: &[BaseRow] = &[
    ("Quetta Base Alpha", 8.0, 7.0, 4, &[(4, 4.0)]),
    ("Quetta Base Beta", 10.0, 9.0, 3, &[(4, 6.0)]),
    ("Quetta Base Gamma", 14.0, 13.0, 5, &[(4, 8.0)]),
    ("Quetta Base Delta", 26.0, 24.0, 2, &[(4, 22.0)]),
    ("Home Base", 5.0, 5.0, 0, &[(0, 4.0), (1, 6.0), (2, 8.0), (3, 22.0)]),
];

pub const CITY_NAMES: [&str; 5] = ["Karachi", "Lahore", "Islamabad", "Peshawar", "Quetta"];

pub fn default_targets() -> Result<LocationGraph, GraphError> {
    let mut graph = LocationGraph::new();
    for (name, rows) in CITY_NAMES
        .iter()
        .zip([KARACHI, LAHORE, ISLAMABAD, PESHAWAR, QUETTA])
    {
        graph.add_city(*name)?;
        for &(base, x, y, priority, edges) in rows {
            graph.add_base(name, Base::new(base, x, y, priority).with_edges(edges))?;
        }
        graph.city(name)?.validate()?;
    }
    Ok(graph)
}
