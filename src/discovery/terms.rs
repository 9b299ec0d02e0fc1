use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use sha2::{Digest, Sha256};

/// A curated group of search terms that backs one discovery bucket.
#[derive(Debug, Clone, Copy)]
pub struct BucketSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub terms: &'static [&'static str],
}

pub const FOR_YOU: BucketSpec = BucketSpec {
    key: "for_you",
    title: "For You",
    terms: &[
        "Arijit Singh",
        "Shreya Ghoshal",
        "A.R. Rahman",
        "Pritam",
        "Ed Sheeran",
        "Taylor Swift",
        "The Weeknd",
        "Diljit Dosanjh",
        "AP Dhillon",
        "Sidhu Moose Wala",
        "Ajay-Atul",
        "Anirudh Ravichander",
        "Sid Sriram",
        "Jubin Nautiyal",
        "Dua Lipa",
        "Coldplay",
        "Atif Aslam",
        "Neha Kakkar",
    ],
};

pub const LANGUAGES: &[BucketSpec] = &[
    BucketSpec {
        key: "hindi",
        title: "Hindi",
        terms: &[
            "bollywood hits",
            "arijit singh romantic",
            "hindi latest",
            "90s bollywood",
            "hindi lofi",
            "bollywood dance",
            "sufi hindi",
        ],
    },
    BucketSpec {
        key: "english",
        title: "English",
        terms: &[
            "top english hits",
            "pop hits",
            "english acoustic",
            "billboard hot 100",
            "indie pop",
            "english rock classics",
            "rnb hits",
        ],
    },
    BucketSpec {
        key: "punjabi",
        title: "Punjabi",
        terms: &[
            "punjabi hits",
            "punjabi latest",
            "bhangra",
            "punjabi romantic",
            "punjabi pop",
            "diljit dosanjh",
        ],
    },
    BucketSpec {
        key: "marathi",
        title: "Marathi",
        terms: &[
            "marathi hits",
            "marathi latest",
            "ajay atul",
            "marathi romantic",
            "lavani",
            "marathi folk",
        ],
    },
    BucketSpec {
        key: "tamil",
        title: "Tamil",
        terms: &[
            "tamil hits",
            "anirudh",
            "tamil melody",
            "kollywood latest",
            "tamil kuthu",
        ],
    },
    BucketSpec {
        key: "telugu",
        title: "Telugu",
        terms: &[
            "telugu hits",
            "tollywood latest",
            "telugu melody",
            "devi sri prasad",
            "telugu mass",
        ],
    },
];

pub const THEMES: &[BucketSpec] = &[
    BucketSpec {
        key: "party",
        title: "Party Hits",
        terms: &[
            "party songs",
            "dance hits",
            "club bangers",
            "bollywood party",
            "edm hits",
        ],
    },
    BucketSpec {
        key: "chill",
        title: "Chill Vibes",
        terms: &[
            "chill lofi",
            "acoustic chill",
            "relaxing songs",
            "late night chill",
            "lofi hindi",
        ],
    },
    BucketSpec {
        key: "romantic",
        title: "Romantic",
        terms: &[
            "romantic songs",
            "love songs",
            "romantic hindi",
            "love ballads",
            "valentine songs",
        ],
    },
    BucketSpec {
        key: "trending",
        title: "Trending Now",
        terms: &[
            "trending songs",
            "viral hits",
            "new releases",
            "top charts",
            "latest hits",
        ],
    },
    BucketSpec {
        key: "workout",
        title: "Workout",
        terms: &[
            "workout songs",
            "gym motivation",
            "running hits",
            "high energy",
            "power workout",
        ],
    },
];

pub fn language(key: &str) -> Option<&'static BucketSpec> {
    LANGUAGES.iter().find(|b| b.key == key)
}

pub fn theme(key: &str) -> Option<&'static BucketSpec> {
    THEMES.iter().find(|b| b.key == key)
}

/// Derives the per-bucket seed from the session seed.
pub fn bucket_seed(seed: u64, bucket: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_be_bytes());
    hasher.update(bucket.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Session order of `pool` for `bucket`. Pure: the same seed always yields the
/// same order.
pub fn ordered_terms(seed: u64, bucket: &str, pool: &[&'static str]) -> Vec<&'static str> {
    let mut terms = pool.to_vec();
    let mut rng = StdRng::seed_from_u64(bucket_seed(seed, bucket));
    terms.shuffle(&mut rng);
    terms
}
