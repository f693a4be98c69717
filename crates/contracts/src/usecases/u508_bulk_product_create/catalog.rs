//! Option lists for the categorical product attributes and the value
//! ranges used when generating sample drafts.

pub const MAIN_CATEGORIES: &[&str] = &["Kohaku", "Showa", "Sanke", "Other Koi"];

const KOHAKU: &[&str] = &["Tancho Kohaku", "Doitsu Kohaku", "Gin Rin Kohaku", "Others"];
const SHOWA: &[&str] = &["Tancho Showa", "Doitsu Showa", "Gin Rin Showa", "Others"];
const SANKE: &[&str] = &["Tancho Sanke", "Doitsu Sanke", "Gin Rin Sanke", "Others"];
const OTHER_KOI: &[&str] = &[
    "Matsukawabake",
    "Cha Utsuri",
    "Mukashi Ogan",
    "Mizuho Ogan",
    "Black Diamond",
    "Saragoi",
    "Kawarimono",
    "Gin Rin Asagi",
    "Benigoi",
    "Chagoi",
    "Goromo",
    "Goshiki",
    "Hi Utsuri",
    "Shiro Utsuri",
    "Ochiba",
    "Kujaku",
    "Ki Utsuri",
    "Shusui",
    "Platinum Ogon",
    "Matsuba",
    "Yamabuki",
    "Kikokuryu",
    "Hariwake",
    "Kigoi",
    "Kabuto",
    "Kumonryu",
];

pub const SEX_OPTIONS: &[&str] = &["Male", "Female"];

pub const BREEDER_OPTIONS: &[&str] = &[
    "Dainichi",
    "Hiroi",
    "Hoshikin",
    "Ikarashi",
    "Isa",
    "Kaneko",
    "Koda",
    "Konishi",
    "Marudo",
    "Maruhiro",
    "Maruju",
    "Marusei",
    "Max Koi Farm",
    "Miyatora",
    "Momotaro",
    "Omosako",
    "Otsuka",
    "Sakai",
    "Sakazume",
    "Shinoda",
    "Torazo",
    "Yamamatsu Koi farm",
];

/// Sub-categories offered for a main category. Unknown or empty main
/// category yields an empty list.
pub fn sub_categories(main_category: &str) -> &'static [&'static str] {
    match main_category {
        "Kohaku" => KOHAKU,
        "Showa" => SHOWA,
        "Sanke" => SANKE,
        "Other Koi" => OTHER_KOI,
        _ => &[],
    }
}

pub fn is_main_category(value: &str) -> bool {
    MAIN_CATEGORIES.contains(&value)
}

/// Price range for generated drafts, in cents.
pub const PRICE_CENTS_RANGE: (u32, u32) = (5_000, 500_000);

/// Age range for generated drafts, in years.
pub const AGE_YEARS_RANGE: (u32, u32) = (1, 6);

/// Size range for generated drafts, in centimetres.
pub const SIZE_CM_RANGE: (u32, u32) = (15, 85);

pub const CM_PER_INCH: f64 = 2.54;
