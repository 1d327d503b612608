use super::normalize::{normalize, province_key};

/// Province key (see [`province_key`]) → official capital.
#[rustfmt::skip]
static CAPITALS: &[(&str, &str)] = &[
    ("ACORUNA", "A Coruña"),
    ("ALAVA", "Vitoria"),
    ("ALBACETE", "Albacete"),
    ("ALICANTE", "Alicante"),
    ("ALMERIA", "Almería"),
    ("ASTURIAS", "Oviedo"),
    ("AVILA", "Ávila"),
    ("BADAJOZ", "Badajoz"),
    ("BARCELONA", "Barcelona"),
    ("BIZKAIA", "Bilbao"),
    ("BURGOS", "Burgos"),
    ("CACERES", "Cáceres"),
    ("CADIZ", "Cádiz"),
    ("CANTABRIA", "Santander"),
    ("CASTELLON", "Castellón de la Plana"),
    ("CEUTA", "Ceuta"),
    ("CIUDADREAL", "Ciudad Real"),
    ("CORDOBA", "Córdoba"),
    ("CUENCA", "Cuenca"),
    ("GERONA", "Girona"),
    ("GIPUZKOA", "San Sebastián"),
    ("GIRONA", "Girona"),
    ("GRANADA", "Granada"),
    ("GUADALAJARA", "Guadalajara"),
    ("GUIPUZCOA", "San Sebastián"),
    ("HUELVA", "Huelva"),
    ("HUESCA", "Huesca"),
    ("ISLASBALEARES", "Palma de Mallorca"),
    ("JAEN", "Jaén"),
    ("LARIOJA", "Logroño"),
    ("LASPALMAS", "Las Palmas de Gran Canaria"),
    ("LEON", "León"),
    ("LLEIDA", "Lleida"),
    ("LUGO", "Lugo"),
    ("MADRID", "Madrid"),
    ("MALAGA", "Málaga"),
    ("MELILLA", "Melilla"),
    ("MURCIA", "Murcia"),
    ("NAVARRA", "Pamplona"),
    ("OURENSE", "Ourense"),
    ("PALENCIA", "Palencia"),
    ("PONTEVEDRA", "Pontevedra"),
    ("SALAMANCA", "Salamanca"),
    ("SANTACRUZDETENERIFE", "Santa Cruz de Tenerife"),
    ("SEGOVIA", "Segovia"),
    ("SEVILLA", "Sevilla"),
    ("SORIA", "Soria"),
    ("TARRAGONA", "Tarragona"),
    ("TENERIFE", "Santa Cruz de Tenerife"),
    ("TERUEL", "Teruel"),
    ("TOLEDO", "Toledo"),
    ("VALENCIA", "Valencia"),
    ("VALLADOLID", "Valladolid"),
    ("VIZCAYA", "Bilbao"),
    ("ZAMORA", "Zamora"),
    ("ZARAGOZA", "Zaragoza"),
];

/// Official capital of `province`, if the province is known.
pub fn capital_of(province: &str) -> Option<&'static str> {
    let key = province_key(province);
    CAPITALS
        .binary_search_by(|(k, _)| (*k).cmp(key.as_str()))
        .ok()
        .map(|i| CAPITALS[i].1)
}

/// True iff `locality` is the capital of `province`. A locality written with
/// `/` or `-` separated variants matches when any single variant equals the
/// capital exactly; containing the capital's name is not enough.
pub fn is_capital_locality(province: &str, locality: &str) -> bool {
    let Some(capital) = capital_of(province) else {
        return false;
    };
    let locality = locality.trim();
    if locality.is_empty() {
        return false;
    }
    let capital = normalize(capital);

    if locality.contains(['/', '-']) {
        return locality
            .split(['/', '-'])
            .filter(|part| !part.is_empty())
            .any(|part| normalize(part) == capital);
    }
    normalize(locality) == capital
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_binary_search() {
        assert!(CAPITALS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn capital_lookup_ignores_accents_and_spaces() {
        assert_eq!(capital_of("Álava"), Some("Vitoria"));
        assert_eq!(capital_of("Ciudad Real"), Some("Ciudad Real"));
        assert_eq!(capital_of("a coruña"), Some("A Coruña"));
        assert_eq!(capital_of("Atlantis"), None);
    }

    #[test]
    fn variants_are_compared_one_by_one() {
        assert!(is_capital_locality("Álava", "Vitoria-Gasteiz"));
        assert!(is_capital_locality("Gipuzkoa", "Donostia/San Sebastián"));
        assert!(is_capital_locality("Madrid", "MADRID"));
        assert!(is_capital_locality("Las Palmas", "Las Palmas de Gran Canaria"));
    }

    #[test]
    fn substring_is_not_a_capital() {
        assert!(!is_capital_locality("Madrid", "Alcalá de Henares"));
        assert!(!is_capital_locality("León", "San Andrés del Rabanedo-León Norte"));
        assert!(!is_capital_locality("Toledo", "Toledo Norte"));
        assert!(!is_capital_locality("Madrid", ""));
        assert!(!is_capital_locality("Atlantis", "Atlantis"));
    }
}
