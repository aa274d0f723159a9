//! Fixed pools the generator samples from.

pub const CATEGORIES: &[&str] = &[
    "Apparel",
    "Home Decor",
    "Accessories",
    "Stationery",
    "Mugs",
    "Phone Cases",
    "Wall Art",
    "Stickers",
];

pub const PRODUCT_TITLES: &[&str] = &[
    "Vintage Floral T-Shirt Design",
    "Motivational Quote Wall Art Print",
    "Custom Pet Portrait Mug",
    "Boho Moon Phase Phone Case",
    "Minimalist Mountain Sticker Pack",
    "Retro Gaming Console Poster",
    "Personalized Name Tote Bag",
    "Watercolor Sunset Canvas Print",
    "Coffee Lover Funny Mug",
    "Astrology Zodiac Sign Shirt",
    "Nature Photography Wall Decor",
    "Vintage Camera Illustration Print",
    "Succulent Plant Sticker Set",
    "Geometric Abstract Art Poster",
    "Inspirational Desk Notepad",
    "Cute Animal Illustration Mug",
    "Adventure Awaits Travel Poster",
    "Mandala Pattern Phone Case",
    "Retro Sunset Graphic Tee",
    "Botanical Line Art Print",
];

pub const KEYWORDS: &[&str] = &[
    "funny coffee mug",
    "motivational wall art",
    "custom pet portrait",
    "vintage t-shirt design",
    "minimalist poster",
    "personalized gift",
    "boho home decor",
    "retro gaming",
    "watercolor print",
    "astrology shirt",
    "nature photography",
    "geometric art",
    "plant sticker",
    "travel poster",
    "inspirational quote",
];

pub const SHOP_NAMES: &[&str] = &[
    "CreativeStudio",
    "ArtisanDesigns",
    "VintageVibes",
    "ModernPrints",
    "CozyCreations",
    "UrbanArtistry",
    "BohoBoutique",
    "RetroRevival",
    "NatureNest",
    "MinimalMerch",
];

pub const NICHES: &[&str] = &[
    "Custom Pet Portraits",
    "Vintage Aesthetic",
    "Motivational Quotes",
    "Minimalist Design",
    "Retro Gaming",
    "Boho Style",
    "Nature Photography",
    "Geometric Patterns",
    "Watercolor Art",
    "Astrology & Zodiac",
    "Coffee Culture",
    "Plant Lovers",
];

/// Related keywords generated per keyword
pub const RELATED_KEYWORD_COUNT: usize = 5;

/// Sample listings embedded in each trend
pub const PRODUCTS_PER_TREND: usize = 5;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
