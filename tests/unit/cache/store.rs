use super::*;

fn small(max_entries: usize) -> RenderCache {
    RenderCache::new(RenderCacheOpts {
        max_entries,
        ..RenderCacheOpts::default()
    })
}

#[test]
fn defaults_match_constants() {
    let opts = RenderCacheOpts::default();
    assert_eq!(opts.max_entries, 100);
    assert_eq!(opts.ttl, Duration::from_secs(600));
    assert_eq!(opts.sweep_interval, Duration::from_secs(60));
    assert_eq!(small(0).opts().max_entries, 1);
}

#[test]
fn put_then_get_returns_png_bytes() {
    let cache = RenderCache::default();
    let id = cache.put(vec![1u8, 2, 3]);
    let hit = cache.get(&id).unwrap();
    assert_eq!(&*hit.bytes, &[1, 2, 3]);
    assert_eq!(hit.content_type, "image/png");
    assert_eq!(cache.len(), 1);
}

#[test]
fn overflow_evicts_exactly_the_oldest() {
    let cache = RenderCache::default();
    let t0 = Instant::now();

    let ids: Vec<CacheId> = (0..MAX_CACHE_ENTRIES)
        .map(|i| cache.put_at(Arc::from(vec![i as u8]), t0 + Duration::from_millis(i as u64)))
        .collect();
    assert_eq!(cache.len(), MAX_CACHE_ENTRIES);

    let newest = cache.put_at(
        Arc::from(vec![0xff]),
        t0 + Duration::from_millis(MAX_CACHE_ENTRIES as u64),
    );
    assert_eq!(cache.len(), MAX_CACHE_ENTRIES);
    assert!(cache.get(&ids[0]).is_none());
    assert!(ids[1..].iter().all(|id| cache.get(id).is_some()));
    assert!(cache.get(&newest).is_some());
}

#[test]
fn same_instant_entries_evict_in_insertion_order() {
    let cache = small(2);
    let now = Instant::now();
    let a = cache.put_at(Arc::from(vec![1]), now);
    let b = cache.put_at(Arc::from(vec![2]), now);
    let c = cache.put_at(Arc::from(vec![3]), now);
    assert!(cache.get(&a).is_none());
    assert!(cache.get(&b).is_some());
    assert!(cache.get(&c).is_some());
}

#[test]
fn reads_do_not_refresh_entries() {
    let cache = small(2);
    let t0 = Instant::now();
    let a = cache.put_at(Arc::from(vec![1]), t0);
    let b = cache.put_at(Arc::from(vec![2]), t0 + Duration::from_millis(1));
    assert!(cache.get(&a).is_some());
    cache.put_at(Arc::from(vec![3]), t0 + Duration::from_millis(2));
    assert!(cache.get(&a).is_none());
    assert!(cache.get(&b).is_some());
}

#[test]
fn sweep_removes_only_expired_entries() {
    let cache = RenderCache::default();
    let t0 = Instant::now();
    let old = cache.put_at(Arc::from(vec![1]), t0);
    let fresh = cache.put_at(Arc::from(vec![2]), t0 + Duration::from_secs(300));

    // Exactly at the TTL an entry is still retained.
    assert_eq!(cache.sweep_expired_at(t0 + CACHE_TTL), 0);
    assert!(cache.get(&old).is_some());

    let removed = cache.sweep_expired_at(t0 + CACHE_TTL + Duration::from_secs(1));
    assert_eq!(removed, 1);
    assert!(cache.get(&old).is_none());
    assert!(cache.get(&fresh).is_some());
}

#[test]
fn expired_entries_stay_readable_until_swept() {
    let cache = RenderCache::new(RenderCacheOpts {
        ttl: Duration::ZERO,
        ..RenderCacheOpts::default()
    });
    let id = cache.put_at(Arc::from(vec![1]), Instant::now() - Duration::from_secs(5));
    assert!(cache.get(&id).is_some());
    cache.sweep_expired();
    assert!(cache.get(&id).is_none());
    assert!(cache.is_empty());
}

#[test]
fn background_sweeper_expires_entries() {
    let cache = Arc::new(RenderCache::new(RenderCacheOpts {
        max_entries: 10,
        ttl: Duration::ZERO,
        sweep_interval: Duration::from_millis(10),
    }));
    let handle = cache.spawn_sweeper().unwrap();
    let id = cache.put_at(Arc::from(vec![1]), Instant::now() - Duration::from_millis(1));

    let deadline = Instant::now() + Duration::from_secs(5);
    while cache.get(&id).is_some() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(cache.get(&id).is_none());
    handle.stop();
}

#[test]
fn sweeper_exits_when_cache_is_dropped() {
    let cache = Arc::new(RenderCache::new(RenderCacheOpts {
        sweep_interval: Duration::from_millis(5),
        ..RenderCacheOpts::default()
    }));
    let handle = cache.spawn_sweeper().unwrap();
    drop(cache);
    // Dropping the handle joins the thread; this must not hang.
    drop(handle);
}

#[test]
fn cache_ids_parse_back() {
    let cache = RenderCache::default();
    let id = cache.put(vec![7u8]);
    let parsed: CacheId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);

    let err = "not-a-uuid".parse::<CacheId>().unwrap_err();
    assert!(matches!(err, PlotshotError::NotFound(_)));
}

#[test]
fn concurrent_puts_respect_capacity() {
    let cache = Arc::new(small(16));
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..50u8 {
                    cache.put(vec![i]);
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
    assert_eq!(cache.len(), 16);
}
