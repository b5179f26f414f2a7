//! Keyword-to-category dictionary, kept as data so keyword lists cannot
//! drift between call sites. Scan order is the declared order below; the
//! first category with a matching substring wins.

pub const ALIMENTACAO: &str = "Alimentação";
pub const TRANSPORTE: &str = "Transporte";
pub const ENTRETENIMENTO: &str = "Entretenimento";
pub const SELF_CARE: &str = "Self Care";
pub const ROUPAS: &str = "Roupas";

/// Category scan order with the known merchant/noun substrings for each.
pub const DICTIONARY: &[(&str, &[&str])] = &[
    (
        ALIMENTACAO,
        &[
            // restaurants and the like
            "restaurante",
            "rest.",
            "churrascaria",
            "pizzaria",
            "pizza",
            "hamburger",
            "burger",
            "lanchonete",
            "bar",
            "boteco",
            "cantina",
            "galeto",
            "padaria",
            "confeitaria",
            "doceria",
            "cafeteria",
            "café",
            "bistro",
            "buffet",
            "grill",
            "pastelaria",
            "sushi",
            "outback",
            "mcdonalds",
            "burger king",
            "subway",
            "habibs",
            "spoleto",
            "madero",
            "dominos",
            "pizza hut",
            "starbucks",
            "kopenhagen",
            "cacau show",
            // delivery
            "ifood",
            "rappi",
            "uber eats",
            "james delivery",
            // groceries
            "carrefour",
            "extra",
            "pao de acucar",
            "assai",
            "mundial",
            "guanabara",
            "zona sul",
            "hortifruti",
            "mercado",
            "supermercado",
            "sacolao",
            "feira",
            "mercearia",
            "atacadao",
            "emporio",
            "armazem",
            "minimercado",
            "acougue",
            "açougue",
            "food",
        ],
    ),
    (
        TRANSPORTE,
        &[
            // ride apps (the 99app token is special-cased ahead of this scan)
            "uber",
            "cabify",
            "taxi",
            "táxi",
            "buser",
            // fuel
            "posto",
            "shell",
            "ipiranga",
            "petrobras",
            "combustivel",
            "gasolina",
            "etanol",
            "diesel",
            // public transport
            "metro",
            "metrô",
            "trem",
            "onibus",
            "ônibus",
            "brt",
            "vlt",
            "bilhete unico",
            "bilhete único",
            "riocard",
            "supervia",
            // parking
            "estacionamento",
            "parking",
            "zona azul",
            "estapar",
        ],
    ),
    (
        ENTRETENIMENTO,
        &[
            // streaming
            "netflix",
            "spotify",
            "amazon prime",
            "disney+",
            "hbo max",
            "youtube premium",
            "deezer",
            "globoplay",
            "crunchyroll",
            "twitch",
            // games
            "steam",
            "playstation",
            "psn",
            "xbox",
            "nintendo",
            "epic games",
            // events
            "cinema",
            "teatro",
            "show",
            "ingresso",
            "sympla",
            "eventbrite",
            "ticketmaster",
            "cinemark",
            "kinoplex",
        ],
    ),
    (
        SELF_CARE,
        &[
            // health
            "farmacia",
            "farmácia",
            "drogaria",
            "pacheco",
            "raia",
            "drogasil",
            "remedio",
            "remédio",
            "consulta",
            "medico",
            "médico",
            "dentista",
            "psicologo",
            "psicólogo",
            "terapeuta",
            "nutricionista",
            "exame",
            "laboratorio",
            "laboratório",
            "clinica",
            "clínica",
            "hospital",
            // beauty
            "salao",
            "salão",
            "cabeleireiro",
            "manicure",
            "pedicure",
            "spa",
            "massagem",
            "barbearia",
            "depilacao",
            // fitness
            "academia",
            "gym",
            "crossfit",
            "pilates",
            "yoga",
            "fitness",
            "smart fit",
            "bodytech",
        ],
    ),
    (
        ROUPAS,
        &[
            // department and clothing stores
            "renner",
            "c&a",
            "riachuelo",
            "marisa",
            "hering",
            "zara",
            "forever 21",
            "leader",
            "h&m",
            // sports stores
            "centauro",
            "decathlon",
            "netshoes",
            "nike",
            "adidas",
            "puma",
            // online stores
            "amazon",
            "americanas",
            "submarino",
            "magalu",
            "magazine luiza",
            "shopee",
            "aliexpress",
            "shein",
            "kabum",
            // other retail
            "casas bahia",
            "ponto frio",
            "leroy merlin",
            "tok&stok",
            "etna",
            "camicado",
        ],
    ),
];

/// Scans the dictionary in declared order against a normalized description.
pub fn lookup(normalized: &str) -> Option<&'static str> {
    for (category, keywords) in DICTIONARY {
        if keywords.iter().any(|kw| normalized.contains(kw)) {
            return Some(category);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_maps_to_food() {
        assert_eq!(lookup("ifood order 123"), Some(ALIMENTACAO));
    }

    #[test]
    fn declared_order_decides_overlaps() {
        // "uber eats" carries both a food keyword and "uber"; Alimentação is
        // scanned first, so the delivery reading wins.
        assert_eq!(lookup("uber eats rio"), Some(ALIMENTACAO));
        assert_eq!(lookup("uber trip"), Some(TRANSPORTE));
    }

    #[test]
    fn unknown_description_has_no_match() {
        assert_eq!(lookup("xyz consulting"), None);
    }
}
