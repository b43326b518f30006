#![forbid(unsafe_code)]

use upsk_contracts::directory::{
    CampusRecord, Counselor, CounselorId, CounselorRole, PLACEHOLDER_OFFICER,
};

/// Teaching campuses served by an IPGK counseling unit, in directory order.
pub const IPGK_CAMPUS_NAMES: [&str; 28] = [
    "IPGK Bahasa Melayu",
    "IPGK Bahasa Antarabangsa",
    "IPGK Ilmu Khas",
    "IPGK Perempuan Melayu",
    "IPGK Pendidikan Islam",
    "IPGK Pendidikan Teknik",
    "IPGK Kampus Gaya",
    "IPGK Kampus Kent",
    "IPGK Kampus Tawau",
    "IPGK Kampus Sarawak",
    "IPGK Kampus Batu Lintang",
    "IPGK Kampus Rajang",
    "ELTC",
    "IPGK Tun Hussein Onn",
    "IPGK Kampus Tun Abdul Razak",
    "IPGK Kampus Temenggong Ibrahim",
    "IPGK Kampus Tuanku Bainun",
    "IPGK Kampus Sultan Mizan",
    "IPGK Kampus Dato' Razali Ismail",
    "IPGK Kampus Darulaman",
    "IPGK Kampus Ipoh",
    "IPGK Kampus Perlis",
    "IPGK Kampus Pulau Pinang",
    "IPGK Kampus Sultan Abdul Halim",
    "IPGK Kampus Tengku Ampuan Afzan",
    "IPGK Kampus Raja Melewar",
    "IPGK Kampus Kota Bharu",
    "IPGK Kampus Keningau",
];

const IPGM_FIXTURE: [(&str, CounselorRole, &str); 2] = [
    (
        "ipgm-1",
        CounselorRole::KetuaPenolongPengarah,
        "https://picsum.photos/seed/ipgm1/400/400",
    ),
    (
        "ipgm-2",
        CounselorRole::PenolongPengarah,
        "https://picsum.photos/seed/ipgm2/400/400",
    ),
];

pub fn ipgm_counselors_default() -> Vec<Counselor> {
    IPGM_FIXTURE
        .iter()
        .filter_map(|(id, role, image)| {
            CounselorId::new(*id).ok().map(|id| {
                Counselor::ipgm_v1(id, PLACEHOLDER_OFFICER, *role, Some((*image).to_string()))
            })
        })
        .collect()
}

pub fn campus_list_default() -> Vec<CampusRecord> {
    IPGK_CAMPUS_NAMES
        .iter()
        .map(|name| CampusRecord::unassigned(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use upsk_contracts::directory::{validate_roster, CounselorCategory, SlotKey};

    #[test]
    fn at_fixture_01_ipgm_roster_is_valid_and_headquarters_only() {
        let roster = ipgm_counselors_default();
        assert_eq!(roster.len(), 2);
        validate_roster(&roster).unwrap();
        assert!(roster
            .iter()
            .all(|c| c.category == CounselorCategory::Ipgm && c.name == PLACEHOLDER_OFFICER));
    }

    #[test]
    fn at_fixture_02_every_campus_starts_unassigned() {
        let campuses = campus_list_default();
        assert_eq!(campuses.len(), 28);
        assert_eq!(campuses[12].name, "ELTC");
        for campus in &campuses {
            for slot in SlotKey::all() {
                assert!(!campus.counselors.is_assigned(*slot));
            }
        }
    }
}
