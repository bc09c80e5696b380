#![allow(non_camel_case_types)]

use std::{
    io,
    mem::{self, MaybeUninit},
    os::fd::RawFd,
};

pub(crate) const SOL_PACKET: libc::c_int = 263;
pub(crate) const PACKET_ADD_MEMBERSHIP: libc::c_int = 1;
pub(crate) const PACKET_MR_PROMISC: libc::c_ushort = 1;

#[repr(C)]
pub(crate) struct packet_mreq {
    pub(crate) mr_ifindex: libc::c_int,
    pub(crate) mr_type: libc::c_ushort,
    pub(crate) mr_alen: libc::c_ushort,
    pub(crate) mr_address: [libc::c_uchar; 8],
}

/// `ether_type` in host byte order, as the protocol argument of `socket(2)`.
pub(crate) fn protocol(ether_type: u16) -> libc::c_int {
    libc::c_int::from(ether_type.to_be())
}

/// Binds `fd` to one interface and EtherType.
/// packet(7): only sll_protocol and sll_ifindex are used for binding.
pub(crate) fn bind_link_layer(fd: RawFd, ifindex: u32, ether_type: u16) -> io::Result<()> {
    let ifindex = libc::c_int::try_from(ifindex)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "interface index out of range"))?;
    // This block is marked unsafe because it uses FFI. The sockaddr_ll lives on
    // our stack for the duration of the call and its size is passed along.
    unsafe {
        let mut ll: libc::sockaddr_ll = MaybeUninit::zeroed().assume_init();
        ll.sll_family = libc::AF_PACKET as libc::c_ushort;
        ll.sll_protocol = ether_type.to_be();
        ll.sll_ifindex = ifindex;
        let err = libc::bind(
            fd,
            &ll as *const libc::sockaddr_ll as *const libc::sockaddr,
            mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
        );
        if err < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

pub(crate) fn set_priority(fd: RawFd, priority: i32) -> io::Result<()> {
    let value: libc::c_int = priority;
    let err = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_PRIORITY,
            &value as *const libc::c_int as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if err < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Puts the interface into promiscuous mode for as long as `fd` stays open.
pub(crate) fn add_promiscuous_membership(fd: RawFd, ifindex: u32) -> io::Result<()> {
    let mreq = packet_mreq {
        mr_ifindex: ifindex as libc::c_int,
        mr_type: PACKET_MR_PROMISC,
        mr_alen: 0,
        mr_address: [0; 8],
    };
    let err = unsafe {
        libc::setsockopt(
            fd,
            SOL_PACKET,
            PACKET_ADD_MEMBERSHIP,
            &mreq as *const packet_mreq as *const libc::c_void,
            mem::size_of::<packet_mreq>() as libc::socklen_t,
        )
    };
    if err < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Receives one frame, returning its length and the ARPHRD type of the link.
pub(crate) fn recv_frame(fd: RawFd, buf: &mut [u8]) -> io::Result<(usize, u16)> {
    // Note comment in `bind_link_layer`; `buf` is borrowed mutably for the call.
    unsafe {
        let mut ll = MaybeUninit::<libc::sockaddr_ll>::zeroed();
        let mut addrlen = mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;
        let bytes = libc::recvfrom(
            fd,
            buf.as_mut_ptr() as *mut libc::c_void,
            buf.len(),
            0,
            ll.as_mut_ptr() as *mut libc::sockaddr,
            &mut addrlen,
        );
        if bytes < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok((bytes as usize, ll.assume_init().sll_hatype))
    }
}

/// Errors after which a packet socket will not deliver anything again.
pub(crate) fn is_link_gone(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::ENETDOWN) | Some(libc::ENXIO) | Some(libc::ENODEV) | Some(libc::EBADF)
    )
}
