//! Static lookup tables mapping each semantic category to its known terms.
//!
//! The tables are compiled in and never mutated at runtime. Lookup semantics are
//! defined by the analyzer: canonicalized substring containment, no stemming. A term
//! belongs to exactly one category; the disjointness invariant is covered by a test.

/// Semantic categories recognized in query text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	Theme,
	District,
	Dong,
	Subway,
	HousingType,
}
impl Category {
	pub const ALL: [Self; 5] =
		[Self::Theme, Self::District, Self::Dong, Self::Subway, Self::HousingType];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Theme => "theme",
			Self::District => "district",
			Self::Dong => "dong",
			Self::Subway => "subway",
			Self::HousingType => "housing_type",
		}
	}
}

/// Returns the known terms for a category, in table order.
pub fn terms(category: Category) -> &'static [&'static str] {
	match category {
		Category::Theme => THEME_TERMS,
		Category::District => DISTRICT_TERMS,
		Category::Dong => DONG_TERMS,
		Category::Subway => SUBWAY_TERMS,
		Category::HousingType => HOUSING_TYPE_TERMS,
	}
}

const THEME_TERMS: &[&str] = &[
	"청년",
	"신혼부부",
	"신혼",
	"육아",
	"시니어",
	"고령자",
	"예술인",
	"예술",
	"반려동물",
	"여성안심",
	"장애인",
	"1인가구",
];

const DISTRICT_TERMS: &[&str] = &[
	"강남구",
	"강동구",
	"강북구",
	"강서구",
	"관악구",
	"광진구",
	"구로구",
	"금천구",
	"노원구",
	"도봉구",
	"동대문구",
	"동작구",
	"마포구",
	"서대문구",
	"서초구",
	"성동구",
	"성북구",
	"송파구",
	"양천구",
	"영등포구",
	"용산구",
	"은평구",
	"종로구",
	"중구",
	"중랑구",
];

const DONG_TERMS: &[&str] = &[
	"역삼동",
	"삼성동",
	"대치동",
	"논현동",
	"성수동",
	"자양동",
	"행당동",
	"망원동",
	"연남동",
	"합정동",
	"창천동",
	"신림동",
	"봉천동",
	"화곡동",
	"문래동",
	"상계동",
	"공릉동",
	"길음동",
	"면목동",
	"암사동",
];

const SUBWAY_TERMS: &[&str] = &[
	"강남역",
	"홍대입구역",
	"건대입구역",
	"왕십리역",
	"신촌역",
	"성수역",
	"서울역",
	"수유역",
	"사당역",
	"지하철",
	"전철",
	"역",
];

const HOUSING_TYPE_TERMS: &[&str] = &[
	"도시형생활주택",
	"공동체주택",
	"쉐어하우스",
	"아파트",
	"오피스텔",
	"빌라",
	"원룸",
	"투룸",
	"주택",
];
