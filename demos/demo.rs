/* demos/demo.rs */

use iplocate::{AddressResolver, HeaderMap, HeaderRule, classify, lookup_target, resolve_client_address};

fn main() {
    println!("=== Client Address Resolution Examples ===\n");

    // Example 1: Forwarded-for hop chain
    example_1_hop_chain();

    // Example 2: Header precedence
    example_2_precedence();

    // Example 3: Local callers use the server's egress address
    example_3_local_caller();

    // Example 4: Custom precedence table
    example_4_custom_rules();

    println!("=== All examples completed! ===");
}

fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn example_1_hop_chain() {
    println!("Example 1: X-Forwarded-For with multiple hops");

    let h = headers(&[("x-forwarded-for", "203.0.113.1, 192.168.1.10, 10.0.0.5")]);
    let ip = resolve_client_address(&h, None);
    println!("Resolved (first hop): {} [{}]", ip, classify(&ip));
    println!();
}

fn example_2_precedence() {
    println!("Example 2: Multiple headers with precedence");

    let h = headers(&[
        ("x-real-ip", "203.0.113.100"),
        ("cf-connecting-ip", "198.51.100.200"),
        ("x-forwarded-for", "192.0.2.50"),
    ]);

    println!("Headers present:");
    for (key, value) in &h {
        println!("  {}: {}", key, value);
    }
    println!("Resolved (cf-connecting-ip wins): {}", resolve_client_address(&h, None));
    println!();
}

fn example_3_local_caller() {
    println!("Example 3: Local caller");

    let h = HeaderMap::new();
    match lookup_target(&h, Some("192.168.1.10")) {
        Some(ip) => println!("Look up {}", ip),
        None => println!("Caller is local, look up the server's egress address"),
    }
    println!();
}

fn example_4_custom_rules() {
    println!("Example 4: Custom precedence table");

    let h = headers(&[("x-client-ip", "203.0.113.200"), ("x-real-ip", "192.168.1.50")]);
    let resolver = AddressResolver::new().with_rules(vec![
        HeaderRule::single("x-client-ip"),
        HeaderRule::single("x-real-ip"),
    ]);

    println!("Custom resolver: {}", resolver.resolve(&h, None));
    println!("Default resolver: {}", resolve_client_address(&h, None));
    println!();
}
