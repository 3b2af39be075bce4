//! Register-port contracts exercised through the CPU-visible surface.

mod common;

use common::*;
use dotclock_core::{memory::Register, Mapper, PatternBus, ResetKind};

#[test]
fn ports_repeat_through_the_full_mirror_range() {
    let mut ppu = new_ppu();

    for base in (0x2000u16..=0x3FF8).step_by(8) {
        // $2000: nametable bits land in t.
        write(&mut ppu, base, 0b0000_0011);
        assert_eq!(ppu.debug_state().t >> 10 & 0b11, 0b11, "ctrl at {base:#06X}");
        write(&mut ppu, 0x2000, 0);

        // $2005 via the mirror: fine X lands in x.
        let _ = read(&mut ppu, STATUS);
        write(&mut ppu, base + 5, 0x07);
        assert_eq!(ppu.debug_state().fine_x, 7, "scroll at {base:#06X}");

        // $2002 via the mirror clears the write toggle set above.
        assert!(ppu.debug_state().w);
        let _ = read(&mut ppu, base + 2);
        assert!(!ppu.debug_state().w, "status at {base:#06X}");

        // $2003/$2004: point and poke primary OAM.
        write(&mut ppu, base + 3, 0x10);
        write(&mut ppu, base + 4, 0xA5);
        write(&mut ppu, 0x2003, 0x10);
        assert_eq!(read(&mut ppu, base + 4), 0xA5, "oam at {base:#06X}");

        // $2006/$2007: address pair plus data write through the mirror.
        write(&mut ppu, base + 6, 0x21);
        write(&mut ppu, base + 6, 0x40);
        write(&mut ppu, base + 7, 0x5A);
        assert_eq!(ppu.debug_state().v, 0x2141, "addr at {base:#06X}");
        assert_eq!(fetch_vram(&mut ppu, 0x2140), 0x5A, "data at {base:#06X}");

        // $2001 via the mirror: rendering gates $2004 writes away from the
        // post-render line.
        write(&mut ppu, base + 1, SHOW_BACKGROUND);
        ppu.debug_set_position(100, 0, 0);
        write(&mut ppu, 0x2003, 0x20);
        write(&mut ppu, 0x2004, 0x77);
        write(&mut ppu, base + 1, 0);
        assert_eq!(read(&mut ppu, 0x2004), 0x00, "mask at {base:#06X}");
        ppu.debug_set_position(241, 0, 0);
    }
}

#[test]
fn status_read_clears_vblank_and_write_toggle() {
    let mut ppu = new_ppu();
    run_to(&mut ppu, 241, 2);
    let first = read(&mut ppu, STATUS);
    assert_ne!(first & VBLANK_BIT, 0);
    let second = read(&mut ppu, STATUS);
    assert_eq!(second & VBLANK_BIT, 0);

    // The next two $2006 writes observe w = 0 then w = 1.
    write(&mut ppu, ADDR, 0x3F);
    assert!(ppu.debug_state().w);
    write(&mut ppu, ADDR, 0x00);
    assert!(!ppu.debug_state().w);
}

#[test]
fn addr_write_pair_composes_v() {
    let mut ppu = new_ppu();
    for (hi, lo) in [(0x00u8, 0x00u8), (0x21, 0x08), (0xFF, 0xFF), (0x3F, 0x1C)] {
        let _ = read(&mut ppu, STATUS);
        write(&mut ppu, ADDR, hi);
        write(&mut ppu, ADDR, lo);
        let expected = (u16::from(hi & 0x3F) << 8) | u16::from(lo);
        assert_eq!(ppu.debug_state().v, expected);
    }
}

#[test]
fn palette_mirrors_alias_both_ways() {
    let mut ppu = new_ppu();
    for alias in [0x3F10u16, 0x3F14, 0x3F18, 0x3F1C] {
        store_vram(&mut ppu, alias - 0x10, 0x2C);
        assert_eq!(fetch_vram(&mut ppu, alias), 0x2C);
        store_vram(&mut ppu, alias, 0x13);
        assert_eq!(fetch_vram(&mut ppu, alias - 0x10), 0x13);
    }
}

#[test]
fn nametable_mirroring_scenarios() {
    use dotclock_core::{Mirroring, Ppu};
    let mut ppu = Ppu::new(Mirroring::Vertical);
    store_vram(&mut ppu, 0x2800, 0xAB);
    assert_eq!(fetch_vram(&mut ppu, 0x2000), 0xAB);
    store_vram(&mut ppu, 0x2C00, 0x55);
    assert_eq!(fetch_vram(&mut ppu, 0x2400), 0x55);
}

#[test]
fn data_port_increments_by_one_or_thirty_two() {
    let mut ppu = new_ppu();
    write(&mut ppu, CTRL, 0x00);
    set_vram_addr(&mut ppu, 0x2000);
    for _ in 0..3 {
        write(&mut ppu, DATA, 0);
    }
    assert_eq!(ppu.debug_state().v, 0x2003);

    write(&mut ppu, CTRL, 0x04);
    set_vram_addr(&mut ppu, 0x2000);
    for _ in 0..3 {
        write(&mut ppu, DATA, 0);
    }
    assert_eq!(ppu.debug_state().v, 0x2000 + 3 * 32);
}

#[test]
fn data_reads_are_buffered_below_the_palette() {
    let mut ppu = new_ppu();
    store_vram(&mut ppu, 0x2100, 0x42);
    store_vram(&mut ppu, 0x2101, 0x43);

    set_vram_addr(&mut ppu, 0x2100);
    let stale = read(&mut ppu, DATA);
    let first = read(&mut ppu, DATA);
    let second = read(&mut ppu, DATA);
    assert_eq!(stale, 0x00, "reset leaves an empty read buffer");
    assert_eq!(first, 0x42);
    assert_eq!(second, 0x43);
}

#[test]
fn palette_reads_skip_the_buffer() {
    let mut ppu = new_ppu();
    store_vram(&mut ppu, 0x3F07, 0x39);
    set_vram_addr(&mut ppu, 0x3F07);
    assert_eq!(read(&mut ppu, DATA), 0x39);
}

#[test]
fn oam_data_read_is_naive_during_rendering() {
    // Pinned behavior: $2004 reads return primary OAM even while rendering.
    let mut ppu = new_ppu();
    store_sprite(&mut ppu, 0, 0x30, 0x31, 0x32, 0x33);
    write(&mut ppu, MASK, SHOW_BACKGROUND | SHOW_SPRITES);
    ppu.debug_set_position(100, 0, 0);
    write(&mut ppu, OAM_ADDR, 2);
    assert_eq!(read(&mut ppu, OAM_DATA), 0x32);
}

#[test]
fn store_only_ports_read_back_the_bus_latch() {
    let mut ppu = new_ppu();
    write(&mut ppu, MASK, 0x4B);
    for port in [CTRL, MASK, OAM_ADDR, SCROLL, ADDR] {
        assert_eq!(read(&mut ppu, port), 0x4B);
    }
}

#[test]
fn advertised_port_access_sets() {
    let store_only = [0x2000u16, 0x2001, 0x2003, 0x2005, 0x2006];
    for addr in store_only {
        let port = Register::from_cpu_addr(addr);
        assert!(port.writable() && !port.readable(), "{port:?}");
    }
    assert!(Register::Status.readable() && !Register::Status.writable());
    for port in [Register::OamData, Register::Data] {
        assert!(port.readable() && port.writable(), "{port:?}");
    }
}

struct ChrRam(Vec<u8>);

impl Mapper for ChrRam {
    fn read(&mut self, addr: u16) -> u8 {
        self.0[(addr & 0x1FFF) as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.0[(addr & 0x1FFF) as usize] = value;
    }
}

#[test]
fn pattern_window_goes_through_the_mapper() {
    let mut ppu = new_ppu();
    let mut chr = ChrRam(vec![0; 0x2000]);
    chr.0[0x0123] = 0x77;

    {
        let mut pattern = PatternBus::from_mapper(&mut chr);
        // Reads of $0000-$1FFF come from the mapper (buffered as usual).
        ppu.cpu_write(ADDR, 0x01, &mut pattern);
        ppu.cpu_write(ADDR, 0x23, &mut pattern);
        let _ = ppu.cpu_read(DATA, &mut pattern);
        assert_eq!(ppu.cpu_read(DATA, &mut pattern), 0x77);

        // Writes into the window land in the mapper, not internal storage.
        ppu.cpu_write(ADDR, 0x02, &mut pattern);
        ppu.cpu_write(ADDR, 0x00, &mut pattern);
        ppu.cpu_write(DATA, 0x5C, &mut pattern);
    }
    assert_eq!(chr.0[0x0200], 0x5C);

    // Without a mapper the same window falls back to internal storage.
    assert_eq!(fetch_vram(&mut ppu, 0x0200), 0x00);
    store_vram(&mut ppu, 0x0200, 0x31);
    assert_eq!(fetch_vram(&mut ppu, 0x0200), 0x31);
    assert_eq!(chr.0[0x0200], 0x5C, "mapper contents untouched");
}

#[test]
fn soft_reset_preserves_primary_oam() {
    let mut ppu = new_ppu();
    store_sprite(&mut ppu, 0, 1, 2, 3, 4);
    ppu.reset(ResetKind::Soft);
    write(&mut ppu, OAM_ADDR, 0);
    assert_eq!(read(&mut ppu, OAM_DATA), 1);

    ppu.reset(ResetKind::PowerOn);
    write(&mut ppu, OAM_ADDR, 0);
    assert_eq!(read(&mut ppu, OAM_DATA), 0);
}

#[test]
fn reset_clears_latches_and_read_buffer() {
    let mut ppu = new_ppu();
    store_vram(&mut ppu, 0x2100, 0x99);
    set_vram_addr(&mut ppu, 0x2100);
    let _ = read(&mut ppu, DATA); // buffer now holds 0x99
    write(&mut ppu, SCROLL, 0x12); // w = 1

    ppu.reset(ResetKind::Soft);
    let state = ppu.debug_state();
    assert_eq!(state.v, 0);
    assert_eq!(state.t, 0);
    assert!(!state.w);
    assert_eq!(state.status, 0);

    // VRAM survives a soft reset; the first read shows the cleared buffer.
    set_vram_addr(&mut ppu, 0x2100);
    assert_eq!(read(&mut ppu, DATA), 0x00);
    assert_eq!(read(&mut ppu, DATA), 0x99);
}
