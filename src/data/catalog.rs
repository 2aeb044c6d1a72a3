//! Static catalog of Italian regions, grouped by macro-area. Drives the
//! inline-keyboard browse flow and the `/region` name search; codes match the
//! `codice_regione` values carried by the regional feed.

pub struct Area {
    pub id: &'static str,
    pub name: &'static str,
    pub regions: &'static [Region],
}

pub struct Region {
    pub id: &'static str,
    pub name: &'static str,
    pub code: u32,
}

pub static AREAS: &[Area] = &[
    Area {
        id: "nordovest",
        name: "Nord-Ovest",
        regions: &[
            Region {
                id: "lombardia",
                name: "Lombardia",
                code: 3,
            },
            Region {
                id: "piemonte",
                name: "Piemonte",
                code: 1,
            },
            Region {
                id: "valledaosta",
                name: "Valle d'Aosta",
                code: 2,
            },
            Region {
                id: "liguria",
                name: "Liguria",
                code: 7,
            },
        ],
    },
    Area {
        id: "nordest",
        name: "Nord-Est",
        regions: &[
            Region {
                id: "bolzano",
                name: "P.A. Bolzano",
                code: 21,
            },
            Region {
                id: "trento",
                name: "P.A. Trento",
                code: 22,
            },
            Region {
                id: "veneto",
                name: "Veneto",
                code: 5,
            },
            Region {
                id: "friuli",
                name: "Friuli-Venezia Giulia",
                code: 6,
            },
            Region {
                id: "emilia",
                name: "Emilia-Romagna",
                code: 8,
            },
        ],
    },
    Area {
        id: "centro",
        name: "Centro",
        regions: &[
            Region {
                id: "toscana",
                name: "Toscana",
                code: 9,
            },
            Region {
                id: "umbria",
                name: "Umbria",
                code: 10,
            },
            Region {
                id: "marche",
                name: "Marche",
                code: 11,
            },
            Region {
                id: "lazio",
                name: "Lazio",
                code: 12,
            },
        ],
    },
    Area {
        id: "sud",
        name: "Sud",
        regions: &[
            Region {
                id: "abruzzo",
                name: "Abruzzo",
                code: 13,
            },
            Region {
                id: "molise",
                name: "Molise",
                code: 14,
            },
            Region {
                id: "campania",
                name: "Campania",
                code: 15,
            },
            Region {
                id: "puglia",
                name: "Puglia",
                code: 16,
            },
            Region {
                id: "basilicata",
                name: "Basilicata",
                code: 17,
            },
            Region {
                id: "calabria",
                name: "Calabria",
                code: 18,
            },
        ],
    },
    Area {
        id: "isole",
        name: "Isole",
        regions: &[
            Region {
                id: "sicilia",
                name: "Sicilia",
                code: 19,
            },
            Region {
                id: "sardegna",
                name: "Sardegna",
                code: 20,
            },
        ],
    },
];

pub fn find_area(area_id: &str) -> Option<&'static Area> {
    AREAS.iter().find(|area| area.id == area_id)
}

pub fn find_region(region_id: &str) -> Option<&'static Region> {
    AREAS
        .iter()
        .flat_map(|area| area.regions.iter())
        .find(|region| region.id == region_id)
}

/// Case-insensitive substring search over region names, first match wins.
pub fn find_region_by_name(fragment: &str) -> Option<&'static Region> {
    let needle = fragment.to_lowercase();
    AREAS
        .iter()
        .flat_map(|area| area.regions.iter())
        .find(|region| region.name.to_lowercase().contains(&needle))
}
