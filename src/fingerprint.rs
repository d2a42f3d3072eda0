use xxhash_rust::xxh3::Xxh3;

use crate::context::BannerContext;
use crate::model::{
    BannerLiteral, Destinations, ImageAsset, ImageFolder, MemberKey, OrbGroup, OverrideBinding,
    SelectionPolicy, StoreSnapshot,
};

const XXH3_SEED: u64 = 0x3c6e_f372_fe94_f82b;

/// Stable 128-bit fingerprint of a store snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Stable 128-bit fingerprint of a banner context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextFingerprint {
    pub hi: u64,
    pub lo: u64,
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_len(&mut self, n: usize) {
        self.write_u64(n as u64);
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_len(s.len());
        self.write_bytes(s.as_bytes());
    }

    fn write_opt_str(&mut self, s: Option<&str>) {
        match s {
            Some(s) => {
                self.write_u8(1);
                self.write_str(s);
            }
            None => self.write_u8(0),
        }
    }

    fn finish(self) -> (u64, u64) {
        let v = self.inner.digest128();
        ((v >> 64) as u64, v as u64)
    }
}

/// Fingerprint everything resolution can read from a snapshot.
pub fn fingerprint_store(snap: &StoreSnapshot) -> StoreFingerprint {
    let mut h = StableHasher::new();

    h.write_len(snap.image_folders.len());
    for f in &snap.image_folders {
        write_folder(&mut h, f);
    }

    h.write_len(snap.orb_groups.len());
    for o in &snap.orb_groups {
        write_orb(&mut h, o);
    }

    h.write_len(snap.banner_bindings.len());
    for (k, b) in &snap.banner_bindings {
        h.write_str(k);
        write_binding(&mut h, b);
    }

    match &snap.theme_group_leader {
        Some(k) => {
            h.write_u8(1);
            write_member_key(&mut h, k);
        }
        None => h.write_u8(0),
    }

    match &snap.global_overlay {
        Some(l) => {
            h.write_u8(1);
            write_literal(&mut h, l);
        }
        None => h.write_u8(0),
    }

    h.write_len(snap.playlists.len());
    for p in &snap.playlists {
        h.write_str(p.id.as_str());
        h.write_str(&p.name);
    }

    let (hi, lo) = h.finish();
    StoreFingerprint { hi, lo }
}

/// Fingerprint the full input tuple of a context.
pub fn fingerprint_context(ctx: &BannerContext) -> ContextFingerprint {
    let mut h = StableHasher::new();
    h.write_str(ctx.page_title());
    h.write_str(ctx.page_type().as_str());
    h.write_opt_str(ctx.playlist_id().map(|p| p.as_str()));
    h.write_opt_str(ctx.playlist_name());
    h.write_opt_str(ctx.folder_color().map(|c| c.as_str()));
    h.write_str(ctx.seed());
    let (hi, lo) = h.finish();
    ContextFingerprint { hi, lo }
}

fn write_folder(h: &mut StableHasher, f: &ImageFolder) {
    h.write_str(f.id.as_str());
    h.write_str(&f.name);
    h.write_u8(match f.selection_policy {
        SelectionPolicy::Random => 0,
        SelectionPolicy::Sequential => 1,
    });
    h.write_bool(f.is_theme_folder);
    h.write_len(f.playlist_ids.len());
    for p in &f.playlist_ids {
        h.write_str(p.as_str());
    }
    h.write_len(f.color_assignments.len());
    for (c, i) in &f.color_assignments {
        h.write_str(c.as_str());
        h.write_str(i.as_str());
    }
    h.write_len(f.images.len());
    for img in &f.images {
        write_asset(h, img);
    }
}

fn write_asset(h: &mut StableHasher, a: &ImageAsset) {
    h.write_str(a.id.as_str());
    h.write_str(&a.image);
    h.write_f64(a.scale);
    h.write_f64(a.x_offset);
    h.write_f64(a.y_offset);
    h.write_opt_str(a.bg_color.as_deref());
    match &a.destinations {
        Some(d) => {
            h.write_u8(1);
            write_destinations(h, d);
        }
        None => h.write_u8(0),
    }
    h.write_len(a.group_members.len());
    for m in &a.group_members {
        write_member_key(h, m);
    }
}

fn write_destinations(h: &mut StableHasher, d: &Destinations) {
    h.write_len(d.pages.len());
    for p in &d.pages {
        h.write_str(p.as_str());
    }
    h.write_len(d.folder_colors.len());
    for c in &d.folder_colors {
        h.write_str(c.as_str());
    }
}

fn write_member_key(h: &mut StableHasher, k: &MemberKey) {
    match k {
        MemberKey::Explicit(r) => {
            h.write_u8(0);
            h.write_str(r.folder_id.as_str());
            h.write_str(r.image_id.as_str());
        }
        MemberKey::Composite(s) => {
            h.write_u8(1);
            h.write_str(s);
        }
    }
}

fn write_orb(h: &mut StableHasher, o: &OrbGroup) {
    h.write_str(o.id.as_str());
    match &o.playlist_ids {
        Some(ids) => {
            h.write_u8(1);
            h.write_len(ids.len());
            for p in ids {
                h.write_str(p.as_str());
            }
        }
        None => h.write_u8(0),
    }
    h.write_str(&o.image);
    h.write_f64(o.scale);
    h.write_f64(o.x_offset);
    h.write_f64(o.y_offset);
    h.write_opt_str(o.bg_color.as_deref());
    h.write_len(o.folder_colors.len());
    for c in &o.folder_colors {
        h.write_str(c.as_str());
    }
    h.write_len(o.group_members.len());
    for m in &o.group_members {
        h.write_str(m.as_str());
    }
}

fn write_binding(h: &mut StableHasher, b: &OverrideBinding) {
    h.write_opt_str(b.image.as_deref());
    h.write_f64(b.scale);
    h.write_f64(b.x_offset);
    h.write_f64(b.y_offset);
    h.write_opt_str(b.bg_color.as_deref());
    h.write_opt_str(b.image_id.as_ref().map(|i| i.as_str()));
    h.write_opt_str(b.folder_id.as_ref().map(|f| f.as_str()));
}

fn write_literal(h: &mut StableHasher, l: &BannerLiteral) {
    h.write_str(&l.image);
    h.write_f64(l.scale);
    h.write_f64(l.x_offset);
    h.write_f64(l.y_offset);
    h.write_opt_str(l.bg_color.as_deref());
}
